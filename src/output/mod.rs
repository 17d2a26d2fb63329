//! Terminal output helpers: colored status lines, gated on whether
//! stdout is actually a terminal.

use is_terminal::IsTerminal;

pub const RED: &str = "\x1b[0;31m";
pub const GREEN: &str = "\x1b[0;32m";
pub const YELLOW: &str = "\x1b[1;33m";
pub const CYAN: &str = "\x1b[0;36m";
pub const MAGENTA: &str = "\x1b[0;35m";
pub const BOLD: &str = "\x1b[1m";
pub const NC: &str = "\x1b[0m";

#[inline]
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

pub fn info(msg: &str) {
    let (color, reset) = colors(GREEN);
    println!("{color}[INFO]{reset} {msg}");
}

pub fn warn(msg: &str) {
    let (color, reset) = colors(YELLOW);
    eprintln!("{color}[WARN]{reset} {msg}");
}

pub fn error(msg: &str) {
    let (color, reset) = colors(RED);
    eprintln!("{color}[ERROR]{reset} {msg}");
}

pub fn success(msg: &str) {
    let (color, reset) = colors(MAGENTA);
    println!("{color}[OK]{reset} {msg}");
}

pub fn header(msg: &str) {
    let (bold, reset) = colors(BOLD);
    println!("{bold}===>{reset} {msg}");
    println!();
}

pub fn cmd(cmd: &str) {
    let (color, reset) = colors(CYAN);
    eprintln!("{color}[CMD]{reset} {cmd}");
}

fn colors(color: &'static str) -> (&'static str, &'static str) {
    if is_terminal() {
        (color, NC)
    } else {
        ("", "")
    }
}

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
