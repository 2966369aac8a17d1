//! Utility to set the stored profile from the command line
//!
//! Usage: set_profile <first_name> <last_name> <email> <username>

use mealcart::models::Profile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [first_name, last_name, email, username] = <[String; 4]>::try_from(args).map_err(|_| {
        "usage: set_profile <first_name> <last_name> <email> <username>".to_string()
    })?;

    let db_path = mealcart::config::database_path();
    println!("Database path: {}", db_path.display());

    let database = mealcart::config::open_database(&db_path)?;

    let profile = mealcart::tools::account::set_profile(
        &database,
        Profile {
            first_name,
            last_name,
            email,
            username,
        },
    )?;

    println!("Profile set:");
    println!("  Name: {} {}", profile.first_name, profile.last_name);
    println!("  Email: {}", profile.email);
    println!("  Username: {}", profile.username);

    Ok(())
}
