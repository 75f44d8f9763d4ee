//! Free-text search command

use anyhow::Result;

use hemobank_common::display::{self, Level};
use hemobank_common::intent::EXAMPLE_QUESTIONS;
use hemobank_common::{BloodBankDb, QueryTranslator};

use crate::table;

pub fn run(db: &BloodBankDb, question: &str) -> Result<()> {
    let translator = QueryTranslator::new();
    let Some(query) = translator.translate(question) else {
        println!(
            "{}",
            display::status(Level::Error, "I could not understand that question")
        );
        println!("{}", display::status(Level::Info, "Try one of:"));
        for example in EXAMPLE_QUESTIONS {
            println!("  {example}");
        }
        return Ok(());
    };

    let result = db.search(&query)?;
    if result.is_empty() {
        println!("{}", display::status(Level::Warning, "No relevant data found"));
    } else {
        table::print(&result);
    }
    Ok(())
}
