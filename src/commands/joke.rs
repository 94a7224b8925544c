use rand::seq::SliceRandom;

pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people in the world: those who understand binary and those who don't.",
    "A SQL query walks into a bar, goes up to two tables and asks: can I join you?",
    "Why did the developer go broke? Because he used up all his cache.",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "Why do Java developers wear glasses? Because they don't C sharp.",
    "The best thing about a boolean is that even if you are wrong, you are only off by a bit.",
    "Knock knock. Race condition. Who's there?",
    "To understand recursion, you must first understand recursion.",
    "Programming is ten percent writing code and ninety percent understanding why it doesn't work.",
    "Why was the function sad after the party? It didn't get called.",
    "My code doesn't have bugs, it just develops random undocumented features.",
];

pub fn get_joke() -> String {
    JOKES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(JOKES[0])
        .to_string()
}
