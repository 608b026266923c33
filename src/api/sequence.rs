use std::cell::Cell;
use std::rc::Rc;

/// Identifies one request issued by a [`RequestSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Orders overlapping requests so that only the response to the most
/// recently issued one is applied. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
	latest: Rc<Cell<u64>>,
}

impl RequestSequence {
	/// Sequence with no ticket issued.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a request, superseding every earlier ticket.
	pub fn issue(&self) -> Ticket {
		let next = self.latest.get() + 1;
		self.latest.set(next);
		Ticket(next)
	}

	/// Whether no newer ticket was issued since this one.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.latest.get() == ticket.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_latest_ticket_is_current() {
		let seq = RequestSequence::new();
		let first = seq.issue();
		assert!(seq.is_current(first));
		let second = seq.clone().issue();
		assert!(!seq.is_current(first));
		assert!(seq.is_current(second));
		assert!(second > first);
	}
}
