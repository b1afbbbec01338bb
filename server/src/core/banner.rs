//! Startup banner and URL display

use super::config::is_all_interfaces;
use super::constants::APP_NAME;

/// Print the startup banner with the API URLs
pub fn print_banner(host: &str, port: u16, database: &str) {
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };
    const W: usize = 10;

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[36mhttp://{}:{}/api/v1/invoices\x1b[0m",
        "Invoices:", display_host, port
    );
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m \x1b[36mhttp://{}:{}/api/v1/invoices/filters\x1b[0m",
        "Filters:", display_host, port
    );
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Database:", database);
    println!();
}
