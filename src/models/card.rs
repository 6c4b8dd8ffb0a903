//! Card model matching the persisted collection layout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

/// Printed rarity of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    #[serde(rename = "Rare Holo")]
    RareHolo,
    #[serde(rename = "Ultra Rare")]
    UltraRare,
    #[serde(rename = "Secret Rare")]
    SecretRare,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::RareHolo,
        Rarity::UltraRare,
        Rarity::SecretRare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::RareHolo => "Rare Holo",
            Rarity::UltraRare => "Ultra Rare",
            Rarity::SecretRare => "Secret Rare",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Style class used by list badges, e.g. `rare-holo`.
    pub fn css_class(&self) -> String {
        self.as_str().to_lowercase().replace(' ', "-")
    }
}

/// Physical condition of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Mint,
    #[serde(rename = "Near Mint")]
    NearMint,
    Excellent,
    Good,
    Poor,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Mint,
        Condition::NearMint,
        Condition::Excellent,
        Condition::Good,
        Condition::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Mint => "Mint",
            Condition::NearMint => "Near Mint",
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::Poor => "Poor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A card in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub set: String,
    pub number: String,
    pub rarity: Rarity,
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "lenient_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated field values for a card, independent of identity and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFields {
    pub name: String,
    pub set: String,
    pub number: String,
    pub rarity: Rarity,
    pub condition: Condition,
    pub image: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub notes: Option<String>,
}

impl Card {
    /// Current field values, used as the base of a partial update.
    pub fn fields(&self) -> CardFields {
        CardFields {
            name: self.name.clone(),
            set: self.set.clone(),
            number: self.number.clone(),
            rarity: self.rarity,
            condition: self.condition,
            image: self.image.clone(),
            purchase_date: self.purchase_date,
            purchase_price: self.purchase_price,
            notes: self.notes.clone(),
        }
    }

    pub fn apply(&mut self, fields: CardFields) {
        self.name = fields.name;
        self.set = fields.set;
        self.number = fields.number;
        self.rarity = fields.rarity;
        self.condition = fields.condition;
        self.image = fields.image;
        self.purchase_date = fields.purchase_date;
        self.purchase_price = fields.purchase_price;
        self.notes = fields.notes;
    }
}

/// A price as typed into a form: either a JSON number or numeric text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// Empty text means "no price".
    fn parse(&self) -> Result<Option<f64>, String> {
        match self {
            PriceInput::Number(n) => Ok(Some(*n)),
            PriceInput::Text(s) if s.trim().is_empty() => Ok(None),
            PriceInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("Invalid purchase price: {}", s)),
        }
    }
}

/// Request body for creating a new card.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub purchase_price: Option<PriceInput>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateCardRequest {
    /// Check required fields and enumerations, normalizing optional fields.
    pub fn validate(&self) -> Result<CardFields, AppError> {
        Ok(CardFields {
            name: required("name", &self.name)?,
            set: required("set", &self.set)?,
            number: required("number", &self.number)?,
            rarity: parse_rarity(&self.rarity)?,
            condition: parse_condition(&self.condition)?,
            image: non_empty(self.image.as_deref()),
            purchase_date: parse_date(self.purchase_date.as_deref())?,
            purchase_price: parse_price(self.purchase_price.as_ref())?,
            notes: non_empty(self.notes.as_deref()),
        })
    }
}

/// Request body for updating an existing card.
///
/// An omitted field is left unchanged. For optional fields an explicit
/// `null` or empty string clears the value; required fields reject both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub set: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub rarity: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub condition: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub purchase_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub purchase_price: Option<Option<PriceInput>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl UpdateCardRequest {
    /// Merge the supplied values over `current`, validating each one.
    pub fn merge(&self, current: CardFields) -> Result<CardFields, AppError> {
        let mut fields = current;

        if let Some(name) = &self.name {
            fields.name = required("name", present("name", name)?)?;
        }
        if let Some(set) = &self.set {
            fields.set = required("set", present("set", set)?)?;
        }
        if let Some(number) = &self.number {
            fields.number = required("number", present("number", number)?)?;
        }
        if let Some(rarity) = &self.rarity {
            fields.rarity = parse_rarity(present("rarity", rarity)?)?;
        }
        if let Some(condition) = &self.condition {
            fields.condition = parse_condition(present("condition", condition)?)?;
        }
        if let Some(image) = &self.image {
            fields.image = non_empty(image.as_deref());
        }
        if let Some(date) = &self.purchase_date {
            fields.purchase_date = parse_date(date.as_deref())?;
        }
        if let Some(price) = &self.purchase_price {
            fields.purchase_price = parse_price(price.as_ref())?;
        }
        if let Some(notes) = &self.notes {
            fields.notes = non_empty(notes.as_deref());
        }

        Ok(fields)
    }
}

/// Whitespace-only counts as missing; anything else is kept verbatim.
fn required(field: &str, value: &str) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("Card {} is required", field)));
    }
    Ok(value.to_string())
}

/// A required field sent as `null` in an update.
fn present<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .ok_or_else(|| AppError::Validation(format!("Card {} cannot be cleared", field)))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn parse_rarity(value: &str) -> Result<Rarity, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation("Card rarity is required".to_string()));
    }
    Rarity::parse(value).ok_or_else(|| AppError::Validation(format!("Unknown rarity: {}", value)))
}

fn parse_condition(value: &str) -> Result<Condition, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(
            "Card condition is required".to_string(),
        ));
    }
    Condition::parse(value)
        .ok_or_else(|| AppError::Validation(format!("Unknown condition: {}", value)))
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => date_prefix(raw)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid purchase date: {}", raw))),
    }
}

fn parse_price(value: Option<&PriceInput>) -> Result<Option<f64>, AppError> {
    let Some(input) = value else {
        return Ok(None);
    };
    let price = input.parse().map_err(AppError::Validation)?;
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(AppError::Validation(format!(
            "Purchase price must be a non-negative amount, got {}",
            p
        ))),
        other => Ok(other),
    }
}

/// Accepts `YYYY-MM-DD` or any timestamp starting with one.
fn date_prefix(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => date_prefix(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid purchase date: {}", s))),
    }
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<PriceInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(input) => input.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> CreateCardRequest {
        CreateCardRequest {
            name: "Pikachu".to_string(),
            set: "Base".to_string(),
            number: "58/102".to_string(),
            rarity: "Rare Holo".to_string(),
            condition: "Near Mint".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rarity_round_trip_names() {
        for rarity in Rarity::ALL {
            assert_eq!(Rarity::parse(rarity.as_str()), Some(rarity));
        }
        assert_eq!(Rarity::parse("rare holo"), None);
        assert_eq!(Rarity::RareHolo.css_class(), "rare-holo");
        assert_eq!(Rarity::Common.css_class(), "common");
    }

    #[test]
    fn test_condition_parse() {
        assert_eq!(Condition::parse("Near Mint"), Some(Condition::NearMint));
        assert_eq!(Condition::parse("Damaged"), None);
    }

    #[test]
    fn test_create_validation_normalizes_blank_optionals() {
        let mut request = valid_request();
        request.image = Some("".to_string());
        request.notes = Some("   ".to_string());
        request.purchase_price = Some(PriceInput::Text("12.50".to_string()));
        request.purchase_date = Some("2023-04-01".to_string());

        let fields = request.validate().unwrap();
        assert_eq!(fields.name, "Pikachu");
        assert_eq!(fields.rarity, Rarity::RareHolo);
        assert_eq!(fields.image, None);
        assert_eq!(fields.notes, None);
        assert_eq!(fields.purchase_price, Some(12.5));
        assert_eq!(
            fields.purchase_date,
            NaiveDate::from_ymd_opt(2023, 4, 1)
        );
    }

    #[test]
    fn test_create_validation_keeps_text_verbatim() {
        let mut request = valid_request();
        request.name = "  Pikachu ".to_string();
        request.number = " 58/102".to_string();
        request.notes = Some("  - 1st edition\n  - shadowless\n".to_string());

        let fields = request.validate().unwrap();
        assert_eq!(fields.name, request.name);
        assert_eq!(fields.number, request.number);
        assert_eq!(fields.notes, request.notes);
    }

    #[test]
    fn test_create_validation_rejects_missing_fields() {
        for field in ["name", "set", "number", "rarity", "condition"] {
            let mut request = valid_request();
            match field {
                "name" => request.name.clear(),
                "set" => request.set = " ".to_string(),
                "number" => request.number.clear(),
                "rarity" => request.rarity.clear(),
                _ => request.condition.clear(),
            }
            let err = request.validate().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{}", field);
        }
    }

    #[test]
    fn test_create_validation_rejects_unknown_enums() {
        let mut request = valid_request();
        request.rarity = "Legendary".to_string();
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));

        let mut request = valid_request();
        request.condition = "near mint".to_string();
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_create_validation_rejects_bad_price_and_date() {
        let mut request = valid_request();
        request.purchase_price = Some(PriceInput::Number(-1.0));
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));

        let mut request = valid_request();
        request.purchase_price = Some(PriceInput::Text("cheap".to_string()));
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));

        let mut request = valid_request();
        request.purchase_date = Some("yesterday".to_string());
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_request_distinguishes_absent_and_null() {
        let request: UpdateCardRequest =
            serde_json::from_value(json!({ "notes": null, "name": "Raichu" })).unwrap();
        assert_eq!(request.notes, Some(None));
        assert_eq!(request.image, None);

        let current = valid_request().validate().unwrap();
        let current = CardFields {
            notes: Some("first edition".to_string()),
            image: Some("https://img/1.png".to_string()),
            ..current
        };
        let merged = request.merge(current).unwrap();
        assert_eq!(merged.name, "Raichu");
        assert_eq!(merged.notes, None);
        assert_eq!(merged.image.as_deref(), Some("https://img/1.png"));
    }

    #[test]
    fn test_update_cannot_clear_required_field() {
        let request: UpdateCardRequest = serde_json::from_value(json!({ "set": "" })).unwrap();
        let current = valid_request().validate().unwrap();
        assert!(matches!(
            request.merge(current),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_update_rejects_null_required_field() {
        for field in ["name", "set", "number", "rarity", "condition"] {
            let request: UpdateCardRequest =
                serde_json::from_value(json!({ field: null })).unwrap();
            let current = valid_request().validate().unwrap();
            assert!(
                matches!(request.merge(current), Err(AppError::Validation(_))),
                "{}",
                field
            );
        }

        let request: UpdateCardRequest = serde_json::from_value(json!({})).unwrap();
        let current = valid_request().validate().unwrap();
        assert_eq!(request.merge(current.clone()).unwrap(), current);
    }

    #[test]
    fn test_update_keeps_notes_verbatim() {
        let request: UpdateCardRequest =
            serde_json::from_value(json!({ "notes": "\tgraded 9\n" })).unwrap();
        let merged = request.merge(valid_request().validate().unwrap()).unwrap();
        assert_eq!(merged.notes.as_deref(), Some("\tgraded 9\n"));
    }

    #[test]
    fn test_card_decodes_legacy_layout() {
        let legacy = json!({
            "_id": "3f2b8c1e-1111-4222-8333-444455556666",
            "name": "Charmander",
            "set": "Base",
            "number": "46",
            "rarity": "Common",
            "condition": "Good",
            "image": null,
            "purchaseDate": "2021-06-15T00:00:00.000Z",
            "purchasePrice": "3.25",
            "notes": null,
            "createdAt": "2021-06-15T10:20:30.123Z"
        });

        let card: Card = serde_json::from_value(legacy).unwrap();
        assert_eq!(card.id, "3f2b8c1e-1111-4222-8333-444455556666");
        assert_eq!(card.purchase_date, NaiveDate::from_ymd_opt(2021, 6, 15));
        assert_eq!(card.purchase_price, Some(3.25));
        assert_eq!(card.updated_at, None);

        let reencoded = serde_json::to_value(&card).unwrap();
        assert_eq!(reencoded["_id"], "3f2b8c1e-1111-4222-8333-444455556666");
        assert_eq!(reencoded["purchaseDate"], "2021-06-15");
        assert_eq!(reencoded["purchasePrice"], 3.25);
    }

    #[test]
    fn test_card_rejects_unknown_rarity_on_load() {
        let bad = json!({
            "_id": "x",
            "name": "Mew",
            "set": "Promo",
            "number": "8",
            "rarity": "Mythic",
            "condition": "Mint",
            "createdAt": "2021-06-15T10:20:30Z"
        });
        assert!(serde_json::from_value::<Card>(bad).is_err());
    }
}
