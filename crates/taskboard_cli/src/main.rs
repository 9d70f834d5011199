//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskboard_core` linkage and
//!   database bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use taskboard_core::db::migrations::latest_version;
use taskboard_core::db::open_db_in_memory;

fn main() {
    println!("taskboard_core version={}", taskboard_core::core_version());
    match open_db_in_memory() {
        Ok(_conn) => println!("schema_version={}", latest_version()),
        Err(err) => {
            eprintln!("database bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}
