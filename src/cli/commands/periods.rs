//! Periods command handler

use academic_records::config::Config;
use academic_records::core::access::{Caller, Role};
use academic_records::error;

/// List the period codes visible to the caller, with calendar names when known
pub fn run(role: Role, user_id: u64, student: Option<u64>, config: &Config) {
    let result = super::load_records(config).and_then(|book| {
        let periods = book
            .available_periods(&Caller::new(role, user_id), student)
            .map_err(|e| format!("✗ {e}"))?;

        if periods.is_empty() {
            println!("No periods on record");
        }
        for code in periods {
            match book.period(&code) {
                Some(period) => println!("{code}  {}", period.name),
                None => println!("{code}"),
            }
        }
        Ok(())
    });

    if let Err(err) = result {
        error!("Listing periods failed: {err}");
        super::fail(&err);
    }
}
