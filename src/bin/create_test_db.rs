use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use finance_tracker::{
    NewTransaction, NewUser, PasswordHash, TransactionKind, create_transaction, create_user,
    initialize_db,
};

/// A utility for creating a test database for the finance tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user 'test@example.com' with the password 'test'...");

    let user = create_user(
        NewUser {
            username: "Test User".to_owned(),
            email: "test@example.com".to_owned(),
            password_hash: PasswordHash::new("test", PasswordHash::DEFAULT_COST)?,
        },
        &conn,
    )?;

    println!("Creating sample transactions...");

    let samples = [
        (TransactionKind::Income, 3200.0, "Salary", date!(2024 - 03 - 01), None),
        (TransactionKind::Expense, 1450.0, "Rent", date!(2024 - 03 - 02), None),
        (
            TransactionKind::Expense,
            86.4,
            "Groceries",
            date!(2024 - 03 - 05),
            Some("Weekly shop"),
        ),
        (TransactionKind::Expense, 4.5, "Coffee", date!(2024 - 03 - 06), None),
        (
            TransactionKind::Income,
            150.0,
            "Freelance",
            date!(2024 - 03 - 10),
            Some("Logo design"),
        ),
    ];

    for (kind, amount, category, date, notes) in samples {
        create_transaction(
            user.id,
            NewTransaction {
                kind,
                amount,
                category: category.to_owned(),
                date,
                notes: notes.map(str::to_owned),
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
