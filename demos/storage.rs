//! Local storage on disk, session storage in memory, and a few formatters.
//!
//! Run with `RUST_LOG=satchel=debug cargo run --example storage`.

use std::sync::Arc;

use chrono::{Duration, Utc};
use satchel::format::{format_currency, lighten, relative_time, NumberLocale};
use satchel::storage::{FileMedium, MemoryMedium};
use satchel::validate::is_email;
use satchel::{id, BrowserStorage, Medium, Storage, StorageScope};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
struct Profile {
    id: String,
    email: String,
    accent: String,
    balance: f64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::temp_dir().join("satchel-demo").join("local.json");
    let local: Option<Arc<dyn Medium>> = match FileMedium::open(&path) {
        Ok(medium) => Some(Arc::new(medium)),
        Err(err) => {
            eprintln!("cannot open {}: {err}", path.display());
            None
        }
    };

    let storage = BrowserStorage {
        local: Storage::from_medium(local, StorageScope::Local),
        session: Storage::new(Arc::new(MemoryMedium::with_quota(256)), StorageScope::Session),
    };

    let profile: Profile = storage.local.get_or_else("profile", || Profile {
        id: id::uuid(),
        email: "ada@example.com".to_string(),
        accent: "#336699".to_string(),
        balance: 1_250_000.0,
    });
    println!("profile {} (valid email: {})", profile.id, is_email(&profile.email));
    println!("balance {}", format_currency(profile.balance, &NumberLocale::ID_ID, "IDR"));
    println!("hover accent {}", lighten(&profile.accent, 15.0).unwrap_or_default());
    storage.local.set("profile", &profile);

    storage.session.set("last-seen", &(Utc::now() - Duration::minutes(42)).to_rfc3339());
    let last_seen: String = storage.session.get("last-seen", String::new());
    if let Ok(at) = chrono::DateTime::parse_from_rfc3339(&last_seen) {
        println!("last seen {}", relative_time(at.with_timezone(&Utc), Utc::now()));
    }

    // Over quota: logged and dropped, the previous value stays.
    storage.session.set("blob", &"x".repeat(512));
    println!("blob stored: {}", storage.session.contains("blob"));

    println!("local keys: {:?}", storage.local.keys());
    println!("session keys: {:?}", storage.session.keys());
}
