mod profile;

pub use profile::{LegacyMigrationSummary, Profile};
