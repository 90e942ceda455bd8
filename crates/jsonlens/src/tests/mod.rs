mod arbitrary;
mod chunk_helpers;
mod contaminated;
mod properties;
mod serde_events;
mod truncation;
