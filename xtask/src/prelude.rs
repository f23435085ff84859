pub use anstream::println as aprintln;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[38;2;247;118;142m";
const GREEN: &str = "\x1b[38;2;158;206;106m";
const YELLOW: &str = "\x1b[38;2;224;175;104m";
const BLUE: &str = "\x1b[38;2;122;162;247m";
const CYAN: &str = "\x1b[38;2;125;207;255m";

fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}

pub fn p_g(text: &str) -> String {
    paint(GREEN, text)
}

pub fn p_r(text: &str) -> String {
    paint(RED, text)
}

pub fn p_y(text: &str) -> String {
    paint(YELLOW, text)
}

pub fn p_b(text: &str) -> String {
    paint(BLUE, text)
}

pub fn p_c(text: &str) -> String {
    paint(CYAN, text)
}

/// Colors a plan line by its leading marker (`+` add, `-` remove, `~` change).
pub fn p_plan(line: &str) -> String {
    match line.trim_start().chars().next() {
        Some('+') => p_g(line),
        Some('-') => p_r(line),
        Some('~') => p_y(line),
        _ => line.to_string(),
    }
}
