use std::io::Write;

use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute};
use owo_colors::OwoColorize;

const LOGO: [&str; 6] = [
    "██╗ ██████╗       ██████╗  ██████╗ ██╗    ██╗███╗   ██╗██╗      ██████╗  █████╗ ██████╗ ███████╗██████╗ ",
    "██║██╔═══██╗      ██╔══██╗██╔═══██╗██║    ██║████╗  ██║██║     ██╔═══██╗██╔══██╗██╔══██╗██╔════╝██╔══██╗",
    "██║██║   ██║█████╗██║  ██║██║   ██║██║ █╗ ██║██╔██╗ ██║██║     ██║   ██║███████║██║  ██║█████╗  ██████╔╝",
    "██║██║▄▄ ██║╚════╝██║  ██║██║   ██║██║███╗██║██║╚██╗██║██║     ██║   ██║██╔══██║██║  ██║██╔══╝  ██╔══██╗",
    "██║╚██████╔╝      ██████╔╝╚██████╔╝╚███╔███╔╝██║ ╚████║███████╗╚██████╔╝██║  ██║██████╔╝███████╗██║  ██║",
    "╚═╝ ╚══▀▀═╝       ╚═════╝  ╚═════╝  ╚══╝╚══╝ ╚═╝  ╚═══╝╚══════╝ ╚═════╝ ╚═╝  ╚═╝╚═════╝ ╚══════╝╚═╝  ╚═╝",
];

pub fn clear_screen() {
    let mut stdout = std::io::stdout();
    let _ = execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0));
    let _ = stdout.flush();
}

pub fn print_banner() {
    println!();
    for line in LOGO {
        println!("{}", line.bright_red());
    }
    println!(
        "{} - {} - {}\n",
        "[iq-downloader]".yellow(),
        "downloading movies & series from iQ".green(),
        format!("[v{}]", env!("CARGO_PKG_VERSION")).red()
    );
}

/// clears the terminal and redraws the banner between interactive steps.
pub fn refresh() {
    clear_screen();
    print_banner();
}
