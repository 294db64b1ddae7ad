//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `balance_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use balance_core::db::open_db_in_memory;

fn main() {
    println!("balance_core version={}", balance_core::core_version());

    match open_db_in_memory() {
        Ok(_) => println!("balance_core db=ok"),
        Err(err) => {
            eprintln!("balance_core db=error {err}");
            std::process::exit(1);
        }
    }
}
