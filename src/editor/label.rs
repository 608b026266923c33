//! Node label grammar: concrete names and `?name(Type)` variables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EditError;

/// Entity categories a variable can be constrained to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
	/// No constraint, omitted from query strings.
	Any,
	/// Chemical compounds.
	Chemical,
	/// Diseases and conditions.
	Disease,
	/// Tablets, capsules and other dosage forms.
	DosageForm,
	/// Approved or studied drugs.
	Drug,
	/// Inactive formulation ingredients.
	Excipient,
	/// Genes and gene products.
	Gene,
	/// Health states such as pregnancy.
	HealthStatus,
	/// Laboratory methods.
	LabMethod,
	/// Study and treatment methods.
	Method,
	/// Organisms.
	Organism,
	/// Plant families.
	PlantFamily,
	/// Species.
	Species,
	/// Drug targets.
	Target,
	/// Tissues and anatomy.
	Tissue,
}

impl EntityType {
	/// Every category, in display order.
	pub const ALL: &'static [EntityType] = &[
		EntityType::Any,
		EntityType::Chemical,
		EntityType::Disease,
		EntityType::DosageForm,
		EntityType::Drug,
		EntityType::Excipient,
		EntityType::Gene,
		EntityType::HealthStatus,
		EntityType::LabMethod,
		EntityType::Method,
		EntityType::Organism,
		EntityType::PlantFamily,
		EntityType::Species,
		EntityType::Target,
		EntityType::Tissue,
	];

	/// Canonical spelling used in query strings.
	pub fn as_str(self) -> &'static str {
		match self {
			EntityType::Any => "Any",
			EntityType::Chemical => "Chemical",
			EntityType::Disease => "Disease",
			EntityType::DosageForm => "DosageForm",
			EntityType::Drug => "Drug",
			EntityType::Excipient => "Excipient",
			EntityType::Gene => "Gene",
			EntityType::HealthStatus => "HealthStatus",
			EntityType::LabMethod => "LabMethod",
			EntityType::Method => "Method",
			EntityType::Organism => "Organism",
			EntityType::PlantFamily => "PlantFamily",
			EntityType::Species => "Species",
			EntityType::Target => "Target",
			EntityType::Tissue => "Tissue",
		}
	}
}

impl fmt::Display for EntityType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for EntityType {
	type Err = EditError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let wanted = s.trim();
		EntityType::ALL
			.iter()
			.copied()
			.find(|t| t.as_str().eq_ignore_ascii_case(wanted))
			.ok_or_else(|| EditError::UnknownEntityType(wanted.to_string()))
	}
}

/// A parsed variable label such as `?X(Drug)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
	/// Name after the `?`.
	pub name: String,
	/// Annotation, `Any` when absent.
	pub entity_type: EntityType,
}

impl Variable {
	/// Parses `?name` or `?name(Type)`. Returns `Ok(None)` when the label is
	/// not a variable at all.
	pub fn parse(label: &str) -> Result<Option<Self>, EditError> {
		let Some(rest) = label.trim().strip_prefix('?') else {
			return Ok(None);
		};

		let (name, entity_type) = match rest.find('(') {
			Some(open) => {
				let annotation = rest[open + 1..]
					.strip_suffix(')')
					.ok_or_else(|| EditError::MalformedVariable(label.to_string()))?;
				(&rest[..open], annotation.parse::<EntityType>()?)
			}
			None => (rest, EntityType::Any),
		};

		let name = name.trim();
		if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == ')') {
			return Err(EditError::MalformedVariable(label.to_string()));
		}

		Ok(Some(Self {
			name: name.to_string(),
			entity_type,
		}))
	}

	/// The label as it appears in a query string; `Any` is implicit.
	pub fn pattern(&self) -> String {
		match self.entity_type {
			EntityType::Any => format!("?{}", self.name),
			t => format!("?{}({})", self.name, t),
		}
	}
}

impl fmt::Display for Variable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "?{}({})", self.name, self.entity_type)
	}
}

/// Whether the label uses the variable syntax, regardless of validity.
pub fn is_variable(label: &str) -> bool {
	label.trim_start().starts_with('?')
}

/// Wraps a token in double quotes when it contains whitespace.
pub fn quote(token: &str) -> String {
	if token.chars().any(char::is_whitespace) {
		format!("\"{}\"", token)
	} else {
		token.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_bare_variable_as_any() {
		let var = Variable::parse("?X").unwrap().unwrap();
		assert_eq!(var.name, "X");
		assert_eq!(var.entity_type, EntityType::Any);
		assert_eq!(var.pattern(), "?X");
	}

	#[test]
	fn parses_annotation_case_insensitively() {
		let var = Variable::parse("?drug(drug)").unwrap().unwrap();
		assert_eq!(var.entity_type, EntityType::Drug);
		assert_eq!(var.pattern(), "?drug(Drug)");
	}

	#[test]
	fn any_annotation_is_stripped_from_pattern() {
		let var = Variable::parse("?X(Any)").unwrap().unwrap();
		assert_eq!(var.pattern(), "?X");
	}

	#[test]
	fn rejects_lonely_question_mark() {
		assert!(matches!(
			Variable::parse("?"),
			Err(EditError::MalformedVariable(_))
		));
		assert!(matches!(
			Variable::parse("?(Drug)"),
			Err(EditError::MalformedVariable(_))
		));
	}

	#[test]
	fn rejects_unknown_type_and_unclosed_annotation() {
		assert!(matches!(
			Variable::parse("?X(Planet)"),
			Err(EditError::UnknownEntityType(_))
		));
		assert!(matches!(
			Variable::parse("?X(Drug"),
			Err(EditError::MalformedVariable(_))
		));
	}

	#[test]
	fn concrete_labels_are_not_variables() {
		assert_eq!(Variable::parse("Metformin").unwrap(), None);
		assert!(!is_variable("Metformin"));
	}

	#[test]
	fn quotes_only_whitespace_tokens() {
		assert_eq!(quote("Metformin"), "Metformin");
		assert_eq!(quote("Diabetes Mellitus"), "\"Diabetes Mellitus\"");
	}
}
