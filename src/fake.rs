//! Fake data generation helpers.
//!
//! Provides deterministic fake values (names, addresses, dates, identifiers)
//! over an injected RNG so that a single seed reproduces the full dataset.
//! Generated text never contains commas; the flat CSV encoding relies on it.

use chrono::{Duration, NaiveDateTime};
use rand::{Rng, RngExt};

/// First names for fake data
const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "David", "Emma", "Frank", "Grace", "Henry", "Iris", "Jack", "Kate",
    "Leo", "Maya", "Noah", "Olivia", "Peter", "Quinn", "Rose", "Sam", "Tara", "Uma", "Victor",
    "Wendy", "Xavier", "Yara", "Zack", "Anna", "Brian", "Clara", "Derek",
];

/// Last names for fake data
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Martinez",
    "Anderson", "Taylor", "Thomas", "Moore", "Jackson", "Martin", "Lee", "Thompson", "White",
    "Harris", "Clark", "Lewis", "Robinson", "Walker", "Hall", "Young", "King", "Wright", "Hill",
];

/// Company name parts
const COMPANY_PREFIXES: &[&str] = &[
    "Acme", "Global", "Tech", "Prime", "Nova", "Alpha", "Delta", "Omega", "Apex", "Summit",
    "Core", "Edge", "Wave", "Flow", "Spark", "Swift", "Bright", "Clear", "Pioneer", "Keystone",
];

const COMPANY_SUFFIXES: &[&str] = &[
    "Corp",
    "Inc",
    "LLC",
    "Systems",
    "Solutions",
    "Labs",
    "Group",
    "Industries",
    "Dynamics",
    "Works",
    "Holdings",
    "Distribution",
    "Trading",
    "Supply",
    "Partners",
    "Co",
];

/// Product name parts
const PRODUCT_ADJECTIVES: &[&str] = &[
    "Premium", "Pro", "Ultra", "Super", "Mega", "Mini", "Lite", "Plus", "Max", "Elite",
    "Advanced", "Basic", "Standard", "Classic", "Modern", "Smart", "Quick", "Easy", "Fast",
];

const PRODUCT_NOUNS: &[&str] = &[
    "Widget",
    "Gadget",
    "Device",
    "Tool",
    "Kit",
    "Pack",
    "Set",
    "Bundle",
    "System",
    "Module",
    "Component",
    "Unit",
    "Item",
    "Organizer",
    "Charger",
    "Speaker",
    "Backpack",
    "Blender",
];

/// Street name parts for addresses
const STREET_NAMES: &[&str] = &[
    "Oak", "Maple", "Cedar", "Elm", "Pine", "Willow", "Chestnut", "Walnut", "Highland",
    "Sunset", "Ridge", "Meadow", "Lakeview", "Washington", "Lincoln", "Jefferson", "Franklin",
    "Madison", "Harrison", "Monroe",
];

const STREET_SUFFIXES: &[&str] = &[
    "St", "Ave", "Blvd", "Dr", "Ln", "Rd", "Way", "Ct", "Pl", "Ter",
];

/// Two-letter USPS state abbreviations
const STATE_ABBRS: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

/// Lorem ipsum words for description text
const LOREM_WORDS: &[&str] = &[
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
    "enim",
    "ad",
    "minim",
    "veniam",
    "quis",
    "nostrud",
    "exercitation",
    "ullamco",
    "laboris",
    "nisi",
    "aliquip",
    "ex",
    "ea",
    "commodo",
    "consequat",
    "duis",
    "aute",
    "irure",
    "in",
    "voluptate",
    "velit",
];

/// Fake data generator with deterministic RNG
pub struct FakeData<R: Rng> {
    rng: R,
    email_seq: u64,
}

impl<R: Rng> FakeData<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, email_seq: 0 }
    }

    /// Generate a random first name
    pub fn first_name(&mut self) -> &'static str {
        FIRST_NAMES[self.rng.random_range(0..FIRST_NAMES.len())]
    }

    /// Generate a random last name
    pub fn last_name(&mut self) -> &'static str {
        LAST_NAMES[self.rng.random_range(0..LAST_NAMES.len())]
    }

    /// Generate a full name
    pub fn full_name(&mut self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
    }

    /// Generate an email address, unique within one generator instance
    pub fn email(&mut self, first: &str, last: &str, domain: &str) -> String {
        self.email_seq += 1;
        format!(
            "{}.{}{}@{}",
            first.to_lowercase(),
            last.to_lowercase(),
            self.email_seq,
            domain
        )
    }

    /// Generate a company name
    pub fn company_name(&mut self) -> String {
        let prefix = COMPANY_PREFIXES[self.rng.random_range(0..COMPANY_PREFIXES.len())];
        let suffix = COMPANY_SUFFIXES[self.rng.random_range(0..COMPANY_SUFFIXES.len())];
        format!("{} {}", prefix, suffix)
    }

    /// Generate a product name
    pub fn product_name(&mut self) -> String {
        let adj = PRODUCT_ADJECTIVES[self.rng.random_range(0..PRODUCT_ADJECTIVES.len())];
        let noun = PRODUCT_NOUNS[self.rng.random_range(0..PRODUCT_NOUNS.len())];
        format!("{} {}", adj, noun)
    }

    /// Generate a street address ("1423 Maple Ave", no commas)
    pub fn street_address(&mut self) -> String {
        let number: u32 = self.rng.random_range(100..9900);
        let name = STREET_NAMES[self.rng.random_range(0..STREET_NAMES.len())];
        let suffix = STREET_SUFFIXES[self.rng.random_range(0..STREET_SUFFIXES.len())];
        format!("{} {} {}", number, name, suffix)
    }

    /// Generate a city name
    pub fn city(&mut self) -> String {
        let stem = self.last_name();
        match self.rng.random_range(0..4) {
            0 => format!("{}ville", stem),
            1 => format!("{}ton", stem),
            2 => format!("Lake {}", stem),
            _ => format!("Port {}", stem),
        }
    }

    /// Generate a USPS state abbreviation
    pub fn state_abbr(&mut self) -> &'static str {
        STATE_ABBRS[self.rng.random_range(0..STATE_ABBRS.len())]
    }

    /// Generate a 5-digit postal code
    pub fn postcode(&mut self) -> String {
        format!("{:05}", self.rng.random_range(10000..=99999u32))
    }

    /// Generate a phone number
    pub fn phone(&mut self) -> String {
        let area: u32 = self.rng.random_range(200..999);
        let prefix: u32 = self.rng.random_range(200..999);
        let line: u32 = self.rng.random_range(1000..9999);
        format!("+1-{}-{}-{}", area, prefix, line)
    }

    /// Generate a latitude in the continental-US band, 6 decimal places
    pub fn latitude(&mut self) -> f64 {
        round6(self.rng.random_range(24.0..49.5))
    }

    /// Generate a longitude in the continental-US band, 6 decimal places
    pub fn longitude(&mut self) -> f64 {
        round6(self.rng.random_range(-124.8..-66.9))
    }

    /// Generate a SKU ("SKU-" + 8 digits)
    pub fn sku(&mut self) -> String {
        format!("SKU-{}", self.rng.random_range(10_000_000..=99_999_999u32))
    }

    /// Generate a tracking number ("TRK" + 13 digits)
    pub fn tracking_number(&mut self) -> String {
        format!(
            "TRK{}",
            self.rng.random_range(1_000_000_000_000..=9_999_999_999_999u64)
        )
    }

    /// Generate a UUIDv4 string from the seeded RNG stream.
    ///
    /// Draws the 16 random bytes from this generator's RNG rather than OS
    /// randomness, so identifiers reproduce under a fixed seed.
    pub fn uuid(&mut self) -> String {
        let bytes: [u8; 16] = self.rng.random();
        uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
    }

    /// Generate a price rounded to 2 decimal places
    pub fn price(&mut self, min: f64, max: f64) -> f64 {
        let value = self.rng.random_range(min..max);
        (value * 100.0).round() / 100.0
    }

    /// Generate a random integer in the inclusive range
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// Generate a random float in the half-open range
    pub fn float_range(&mut self, min: f64, max: f64) -> f64 {
        self.rng.random_range(min..max)
    }

    /// Generate a boolean with given probability of true
    pub fn bool_with_probability(&mut self, probability: f64) -> bool {
        self.rng.random::<f64>() < probability
    }

    /// Generate lorem ipsum text
    pub fn lorem(&mut self, word_count: usize) -> String {
        (0..word_count)
            .map(|_| LOREM_WORDS[self.rng.random_range(0..LOREM_WORDS.len())])
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Generate a sentence (capitalized, with period)
    pub fn sentence(&mut self, word_count: usize) -> String {
        let mut text = self.lorem(word_count);
        if let Some(first) = text.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        text.push('.');
        text
    }

    /// Pick a random element from a slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }

    /// Sample a key uniformly, with replacement, from a non-empty pool
    pub fn pick_key(&mut self, keys: &[String]) -> String {
        keys[self.rng.random_range(0..keys.len())].clone()
    }

    /// Generate a datetime uniformly distributed in [start, end]
    pub fn datetime_between(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
        let span = (end - start).num_seconds();
        if span <= 0 {
            return start;
        }
        start + Duration::seconds(self.rng.random_range(0..=span))
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fake(seed: u64) -> FakeData<ChaCha8Rng> {
        FakeData::new(ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_deterministic_generation() {
        let mut fake1 = fake(42);
        let mut fake2 = fake(42);

        assert_eq!(fake1.first_name(), fake2.first_name());
        assert_eq!(fake1.company_name(), fake2.company_name());
        assert_eq!(fake1.uuid(), fake2.uuid());
        assert_eq!(fake1.price(10.0, 100.0), fake2.price(10.0, 100.0));
    }

    #[test]
    fn test_email_uniqueness() {
        let mut fake = fake(42);
        let a = fake.email("John", "Doe", "example.com");
        let b = fake.email("John", "Doe", "example.com");
        assert_ne!(a, b);
        assert!(a.starts_with("john.doe"));
        assert!(a.ends_with("@example.com"));
    }

    #[test]
    fn test_price_precision() {
        let mut fake = fake(42);
        let price = fake.price(10.0, 100.0);
        assert_eq!(price, (price * 100.0).round() / 100.0);
    }

    #[test]
    fn test_uuid_shape() {
        let mut fake = fake(7);
        let id = fake.uuid();
        assert_eq!(id.len(), 36);
        // Version nibble must be 4 for a v4 UUID
        assert_eq!(&id[14..15], "4");
    }

    #[test]
    fn test_datetime_between_bounds() {
        let mut fake = fake(42);
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        for _ in 0..100 {
            let dt = fake.datetime_between(start, end);
            assert!(dt >= start && dt <= end);
        }
        // Degenerate range collapses to the start
        assert_eq!(fake.datetime_between(end, start), end);
    }

    #[test]
    fn test_no_commas_in_text_values() {
        let mut fake = fake(42);
        for _ in 0..50 {
            assert!(!fake.street_address().contains(','));
            assert!(!fake.city().contains(','));
            assert!(!fake.company_name().contains(','));
            assert!(!fake.sentence(10).contains(','));
        }
    }
}
