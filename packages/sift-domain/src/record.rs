use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A business listing as the engine sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
	pub id: i64,
	pub name: String,
	pub description: String,
	pub primary_sector: String,
	pub secondary_sector: String,
	pub tag: Option<String>,
	pub stage: String,
	/// Remaining profile fields. Never read by ranking.
	#[serde(default = "empty_object")]
	pub attributes: Value,
}
impl Record {
	/// Text indexed by both the lexical index and the hashed encoder.
	pub fn search_text(&self) -> String {
		[
			self.name.as_str(),
			self.description.as_str(),
			self.primary_sector.as_str(),
			self.secondary_sector.as_str(),
			self.tag.as_deref().unwrap_or_default(),
		]
		.join(" ")
	}

	/// Text compared against the query by the context fuzzy score.
	pub fn context_text(&self) -> String {
		[
			self.description.as_str(),
			self.primary_sector.as_str(),
			self.secondary_sector.as_str(),
			self.tag.as_deref().unwrap_or_default(),
		]
		.join(" ")
	}
}

/// Fields for a record that does not exist yet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewRecord {
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub primary_sector: String,
	#[serde(default)]
	pub secondary_sector: String,
	#[serde(default)]
	pub tag: Option<String>,
	pub stage: String,
	#[serde(default = "empty_object")]
	pub attributes: Value,
}
impl NewRecord {
	pub fn into_record(self, id: i64) -> Record {
		Record {
			id,
			name: self.name,
			description: self.description,
			primary_sector: self.primary_sector,
			secondary_sector: self.secondary_sector,
			tag: normalize_tag(self.tag),
			stage: self.stage,
			attributes: self.attributes,
		}
	}
}

/// Partial update. Absent fields are left alone; a blank `tag` clears it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordPatch {
	pub name: Option<String>,
	pub description: Option<String>,
	pub primary_sector: Option<String>,
	pub secondary_sector: Option<String>,
	pub tag: Option<String>,
	pub stage: Option<String>,
	pub attributes: Option<Value>,
}
impl RecordPatch {
	pub fn is_empty(&self) -> bool {
		!self.touches_search_fields() && self.stage.is_none() && self.attributes.is_none()
	}

	/// True when the patch changes any text the hashed vector is derived from.
	pub fn touches_search_fields(&self) -> bool {
		self.name.is_some()
			|| self.description.is_some()
			|| self.primary_sector.is_some()
			|| self.secondary_sector.is_some()
			|| self.tag.is_some()
	}

	pub fn apply(self, record: &mut Record) {
		if let Some(name) = self.name {
			record.name = name;
		}
		if let Some(description) = self.description {
			record.description = description;
		}
		if let Some(primary_sector) = self.primary_sector {
			record.primary_sector = primary_sector;
		}
		if let Some(secondary_sector) = self.secondary_sector {
			record.secondary_sector = secondary_sector;
		}
		if self.tag.is_some() {
			record.tag = normalize_tag(self.tag);
		}
		if let Some(stage) = self.stage {
			record.stage = stage;
		}
		if let Some(attributes) = self.attributes {
			record.attributes = attributes;
		}
	}
}

pub fn normalize_tag(tag: Option<String>) -> Option<String> {
	tag.filter(|value| !value.trim().is_empty())
}

fn empty_object() -> Value {
	Value::Object(Default::default())
}
