use chrono::{Local, Timelike};

pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good Morning",
        12..=17 => "Good Afternoon",
        _ => "Good Evening",
    }
}

pub fn greet() -> &'static str {
    greeting_for_hour(Local::now().hour())
}
