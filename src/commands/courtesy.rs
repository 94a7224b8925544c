use rand::seq::SliceRandom;

pub const RESPONSES: [&str; 4] = ["You're welcome.", "No problem.", "Anytime.", "All good."];

pub fn handle_courtesy() -> String {
    RESPONSES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(RESPONSES[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_comes_from_the_fixed_set() {
        for _ in 0..20 {
            assert!(RESPONSES.contains(&handle_courtesy().as_str()));
        }
    }
}
