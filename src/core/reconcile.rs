//! Collapses gold records that several provider codes report for one instrument.

use std::collections::HashMap;

use super::quote::{Quote, RawInstrumentRecord};

/// Prefix the gold provider uses for superseded (old mint) instrument codes.
pub const LEGACY_PREFIX: char = 'E';

pub fn is_legacy(provider_code: &str) -> bool {
    provider_code.starts_with(LEGACY_PREFIX)
}

/// Merges records by mapped code, last non-legacy record wins.
///
/// A legacy record only fills a slot nothing has claimed yet. Any canonical
/// record replaces whatever is there. Output keeps first-seen order of codes.
pub fn reconcile<I>(records: I) -> Vec<Quote>
where
    I: IntoIterator<Item = RawInstrumentRecord>,
{
    let mut merged: Vec<Quote> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let quote = Quote::gold(
            &record.mapped_code,
            &record.display_name,
            record.bid,
            record.ask,
        );
        match index.get(&record.mapped_code) {
            None => {
                index.insert(record.mapped_code, merged.len());
                merged.push(quote);
            }
            Some(&slot) if !is_legacy(&record.provider_code) => merged[slot] = quote,
            Some(_) => {}
        }
    }

    merged
}
