use serde::{Deserialize, Serialize};

/// Part of a triple a sentence span supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Subject of the triple.
	Subject,
	/// Relation of the triple.
	Predicate,
	/// Object of the triple.
	Object,
}

impl Role {
	/// Class applied to highlighted text.
	pub fn css_class(self) -> &'static str {
		match self {
			Role::Subject => "prov-subject",
			Role::Predicate => "prov-predicate",
			Role::Object => "prov-object",
		}
	}
}

/// Character range `[start, end)` of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
	/// Which part of the triple the span supports.
	pub role: Role,
	/// First character, counted in chars.
	pub start: usize,
	/// One past the last character.
	pub end: usize,
}

/// A sentence the backend extracted a match from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
	/// Sentence text.
	pub sentence: String,
	/// Highlighted ranges, possibly overlapping.
	#[serde(default)]
	pub spans: Vec<Span>,
}

/// A run of sentence text with at most one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
	/// `None` for plain text.
	pub role: Option<Role>,
	/// Text of the run.
	pub text: String,
}

impl Explanation {
	/// Splits the sentence into plain and highlighted runs. Spans are
	/// clamped to the sentence; where spans overlap, the one starting first
	/// keeps the shared characters.
	pub fn highlight(&self) -> Vec<Segment> {
		let chars: Vec<char> = self.sentence.chars().collect();
		let mut spans = self.spans.clone();
		spans.sort_by_key(|s| s.start);

		let mut segments = Vec::new();
		let mut cursor = 0;
		let mut push = |role: Option<Role>, from: usize, to: usize| {
			if from < to {
				segments.push(Segment {
					role,
					text: chars[from..to].iter().collect(),
				});
			}
		};

		for span in spans {
			let start = span.start.max(cursor).min(chars.len());
			let end = span.end.min(chars.len());
			if start >= end {
				continue;
			}
			push(None, cursor, start);
			push(Some(span.role), start, end);
			cursor = end;
		}
		push(None, cursor, chars.len());
		segments
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn span(role: Role, start: usize, end: usize) -> Span {
		Span { role, start, end }
	}

	#[test]
	fn splits_sentence_by_role() {
		let explanation = Explanation {
			sentence: "Metformin treats diabetes.".into(),
			spans: vec![
				span(Role::Object, 17, 25),
				span(Role::Subject, 0, 9),
				span(Role::Predicate, 10, 16),
			],
		};
		let segments = explanation.highlight();
		let roles: Vec<(Option<Role>, &str)> =
			segments.iter().map(|s| (s.role, s.text.as_str())).collect();
		assert_eq!(
			roles,
			vec![
				(Some(Role::Subject), "Metformin"),
				(None, " "),
				(Some(Role::Predicate), "treats"),
				(None, " "),
				(Some(Role::Object), "diabetes"),
				(None, "."),
			]
		);
	}

	#[test]
	fn overlapping_and_out_of_range_spans_are_trimmed() {
		let explanation = Explanation {
			sentence: "Zölle über".into(),
			spans: vec![
				span(Role::Subject, 0, 5),
				span(Role::Object, 3, 40),
				span(Role::Predicate, 50, 60),
			],
		};
		let segments = explanation.highlight();
		assert_eq!(segments.len(), 2);
		assert_eq!(segments[0].text, "Zölle");
		assert_eq!(segments[1].role, Some(Role::Object));
		assert_eq!(segments[1].text, " über");
	}

	#[test]
	fn no_spans_yields_one_plain_segment() {
		let explanation = Explanation {
			sentence: "Nothing here.".into(),
			spans: Vec::new(),
		};
		assert_eq!(
			explanation.highlight(),
			vec![Segment {
				role: None,
				text: "Nothing here.".into()
			}]
		);
	}
}
