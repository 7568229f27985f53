//! ERC-721 token metadata generation.
//!
//! Builds the JSON documents passed to `mint` as the token URI payload:
//! randomized cosmetic traits, a weighted rarity roll, and numeric stats,
//! plus edition numbering for batch runs.

use anyhow::{bail, Result};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const BACKGROUNDS: [&str; 9] = [
    "Blue", "Red", "Green", "Purple", "Orange", "Pink", "Yellow", "Black", "White",
];
const EYES: [&str; 8] = [
    "Normal", "Laser", "3D", "Zombie", "Robot", "Alien", "Sleepy", "Wink",
];
const MOUTHS: [&str; 8] = [
    "Smile", "Frown", "Open", "Tongue", "Mustache", "Beard", "Pipe", "Cigar",
];
const ACCESSORIES: [&str; 8] = [
    "None", "Hat", "Sunglasses", "Earring", "Necklace", "Bow Tie", "Crown", "Mask",
];

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Attribute {
    pub trait_type: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<u64>,
}

impl Attribute {
    pub fn new(trait_type: &str, value: impl Into<Value>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
            max_value: None,
        }
    }

    pub fn with_max(trait_type: &str, value: impl Into<Value>, max_value: u64) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
            max_value: Some(max_value),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl TokenMetadata {
    pub fn to_json(&self) -> String {
        // Serialization of these plain structs cannot fail.
        serde_json::to_string_pretty(self).expect("metadata serializes")
    }
}

/// Weighted rarity for a roll in `[0, 1)`: Legendary 1%, Epic 4%, Rare 10%,
/// Uncommon 20%, Common 65%.
pub fn rarity_for(roll: f64) -> &'static str {
    if roll < 0.01 {
        "Legendary"
    } else if roll < 0.05 {
        "Epic"
    } else if roll < 0.15 {
        "Rare"
    } else if roll < 0.35 {
        "Uncommon"
    } else {
        "Common"
    }
}

pub struct MetadataGenerator;

impl MetadataGenerator {
    pub fn new() -> Self {
        Self
    }

    /// A standard document: random traits plus any caller-supplied extras.
    pub fn generate(
        &self,
        name: &str,
        description: &str,
        image_url: &str,
        extra: &[Attribute],
    ) -> TokenMetadata {
        let mut attributes = self.random_traits();
        attributes.extend_from_slice(extra);
        attributes.push(Attribute::new("Generation", "Gen 1"));
        attributes.push(Attribute::new("Created Date", today()));

        TokenMetadata {
            name: name.to_string(),
            description: description.to_string(),
            image: image_url.to_string(),
            external_url: None,
            unique_id: None,
            attributes,
        }
    }

    /// Like [`generate`](Self::generate), with a random 16-byte id and a
    /// creation timestamp baked in.
    pub fn generate_unique(&self, name: &str, description: &str, image_url: &str) -> TokenMetadata {
        let mut id_bytes = [0u8; 16];
        rand::thread_rng().fill(&mut id_bytes[..]);
        let unique_id = hex::encode(id_bytes);

        let mut metadata = self.generate(name, description, image_url, &[]);
        metadata
            .attributes
            .push(Attribute::new("Unique ID", unique_id.clone()));
        metadata
            .attributes
            .push(Attribute::new("Created Time", Utc::now().to_rfc3339()));
        metadata.unique_id = Some(unique_id);
        metadata
    }

    /// Numbered edition documents for a batch mint: `Name #i`, per-edition
    /// description and image, and an Edition/Rarity/date attribute set.
    pub fn mint_series(
        &self,
        count: u64,
        base_name: &str,
        base_description: &str,
        base_image_url: &str,
    ) -> Vec<TokenMetadata> {
        (1..=count)
            .map(|edition| {
                let roll: f64 = rand::thread_rng().gen();
                TokenMetadata {
                    name: format!("{base_name} #{edition}"),
                    description: format!("{base_description} - Edition {edition}"),
                    image: format!("{base_image_url}{edition}.png"),
                    external_url: None,
                    unique_id: None,
                    attributes: vec![
                        Attribute::new("Edition", edition),
                        Attribute::new("Rarity", rarity_for(roll)),
                        Attribute::new("Mint Date", today()),
                    ],
                }
            })
            .collect()
    }

    /// Full collection documents with trait rolls and `i of n` editions.
    pub fn collection_series(
        &self,
        count: u64,
        base_name: &str,
        base_description: &str,
        base_image_url: &str,
    ) -> Vec<TokenMetadata> {
        (1..=count)
            .map(|edition| {
                let mut metadata = self.generate(
                    &format!("{base_name} #{edition}"),
                    &format!("{base_description} - Edition {edition} of {count}"),
                    &format!("{base_image_url}{edition}.png"),
                    &[],
                );
                metadata
                    .attributes
                    .push(Attribute::with_max("Edition", edition, count));
                metadata
            })
            .collect()
    }

    fn random_traits(&self) -> Vec<Attribute> {
        let mut rng = rand::thread_rng();
        let mut attributes = vec![
            Attribute::new("Background", pick(&mut rng, &BACKGROUNDS)),
            Attribute::new("Eyes", pick(&mut rng, &EYES)),
            Attribute::new("Mouth", pick(&mut rng, &MOUTHS)),
            Attribute::new("Accessory", pick(&mut rng, &ACCESSORIES)),
            Attribute::new("Rarity", rarity_for(rng.gen())),
        ];
        for stat in ["Strength", "Speed", "Intelligence"] {
            attributes.push(Attribute::with_max(stat, rng.gen_range(1..=100u64), 100));
        }
        attributes
    }
}

impl Default for MetadataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a metadata document before it goes on-chain.
pub fn validate(raw: &str) -> Result<TokenMetadata> {
    let metadata: TokenMetadata =
        serde_json::from_str(raw).map_err(|err| anyhow::anyhow!("invalid metadata: {err}"))?;
    for (field, value) in [
        ("name", &metadata.name),
        ("description", &metadata.description),
        ("image", &metadata.image),
    ] {
        if value.trim().is_empty() {
            bail!("metadata field {field} must not be empty");
        }
    }
    Ok(metadata)
}

fn pick<R: Rng>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool[rng.gen_range(0..pool.len())]
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_thresholds_match_the_weights() {
        assert_eq!(rarity_for(0.0), "Legendary");
        assert_eq!(rarity_for(0.009), "Legendary");
        assert_eq!(rarity_for(0.01), "Epic");
        assert_eq!(rarity_for(0.05), "Rare");
        assert_eq!(rarity_for(0.15), "Uncommon");
        assert_eq!(rarity_for(0.35), "Common");
        assert_eq!(rarity_for(0.999), "Common");
    }

    #[test]
    fn generated_stats_stay_in_range() {
        let generator = MetadataGenerator::new();
        for _ in 0..50 {
            let metadata = generator.generate("NFT", "desc", "https://img/", &[]);
            for attribute in metadata
                .attributes
                .iter()
                .filter(|a| a.max_value == Some(100))
            {
                let value = attribute.value.as_u64().unwrap();
                assert!((1..=100).contains(&value), "{value}");
            }
        }
    }

    #[test]
    fn mint_series_numbers_editions_from_one() {
        let series = MetadataGenerator::new().mint_series(3, "SuperNFT", "test", "https://img/");
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].name, "SuperNFT #1");
        assert_eq!(series[2].name, "SuperNFT #3");
        assert_eq!(series[1].image, "https://img/2.png");
        assert_eq!(series[1].description, "test - Edition 2");
        assert_eq!(series[0].attributes[0].value, serde_json::json!(1));
    }

    #[test]
    fn unique_documents_get_distinct_ids() {
        let generator = MetadataGenerator::new();
        let a = generator.generate_unique("NFT", "desc", "https://img/");
        let b = generator.generate_unique("NFT", "desc", "https://img/");
        assert_ne!(a.unique_id, b.unique_id);
        assert_eq!(a.unique_id.as_ref().unwrap().len(), 32);
    }

    #[test]
    fn validate_rejects_empty_required_fields() {
        let missing_image = serde_json::json!({
            "name": "NFT",
            "description": "desc",
            "image": "",
            "attributes": []
        });
        let err = validate(&missing_image.to_string()).unwrap_err();
        assert!(err.to_string().contains("image"));

        let ok = serde_json::json!({
            "name": "NFT",
            "description": "desc",
            "image": "https://img/1.png",
            "attributes": []
        });
        assert!(validate(&ok.to_string()).is_ok());
    }

    #[test]
    fn round_trips_as_json() {
        let metadata = MetadataGenerator::new().generate("NFT", "desc", "https://img/", &[]);
        let parsed = validate(&metadata.to_json()).unwrap();
        assert_eq!(parsed.name, "NFT");
        assert_eq!(parsed.attributes.len(), metadata.attributes.len());
    }
}
