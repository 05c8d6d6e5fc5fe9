//! CLI smoke entry point.
//!
//! Usage: `catalog_cli [DB_PATH]`. Without a path an in-memory catalog is
//! opened. Prints linkage, version and schema state, then exits.

use catalog_core::db::{open_db, open_db_in_memory, schema_version};
use catalog_core::{ProductRepository, SqliteProductRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("catalog_core ping={}", catalog_core::ping());
    println!("catalog_core version={}", catalog_core::core_version());

    let path = std::env::args().nth(1);
    let opened = match path.as_deref() {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("catalog_cli error=db_open_failed detail={err}");
            return ExitCode::FAILURE;
        }
    };

    match schema_version(&conn) {
        Ok(version) => println!("catalog_core schema_version={version}"),
        Err(err) => {
            eprintln!("catalog_cli error=schema_version detail={err}");
            return ExitCode::FAILURE;
        }
    }

    // Probe the repository contract: an unknown id must map to not-found.
    let probe = SqliteProductRepository::try_new(&conn).and_then(|repo| repo.by_id(0).map(|_| ()));
    match probe {
        Err(err) => println!("catalog_core probe={}", err.error_code()),
        Ok(()) => println!("catalog_core probe=product_0_present"),
    }
    ExitCode::SUCCESS
}
