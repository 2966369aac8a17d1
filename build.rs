//! Meal Cart build script
//!
//! Keeps a running build counter in build_number.txt and hands it, together
//! with the UTC build time, to the compiler as environment variables.

use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

fn next_build_number(counter: &Path) -> u64 {
    let previous = fs::read_to_string(counter)
        .ok()
        .and_then(|text| text.trim().parse::<u64>().ok())
        .unwrap_or(0);
    previous + 1
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let counter = Path::new(COUNTER_FILE);
    let build = next_build_number(counter);
    if let Err(e) = fs::write(counter, build.to_string()) {
        println!("cargo:warning=Could not record build number in {}: {}", COUNTER_FILE, e);
    }

    let built_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    println!("cargo:rustc-env=MEALCART_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=MEALCART_BUILD_TIMESTAMP={}", built_at);
}
