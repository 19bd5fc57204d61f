/// Execute an aggregate command deterministically (no IO, no async).
///
/// 1. **Decide**: calls `aggregate.handle(command)` to get events (no mutation)
/// 2. **Evolve**: applies each event to the aggregate via `aggregate.apply(event)`
///
/// The aggregate is mutated in place and the applied events are returned so the
/// caller can react to them (e.g. forward a purchase to the spend ledger).
pub fn execute<A>(
    aggregate: &mut A,
    command: &A::Command,
) -> Result<Vec<A::Event>, A::Error>
where
    A: grocer_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_core::{Aggregate, AggregateRoot};

    #[derive(Debug, Default)]
    struct Tally {
        total: u32,
        version: u64,
    }

    impl AggregateRoot for Tally {
        type Id = u8;

        fn id(&self) -> &Self::Id {
            &0
        }

        fn version(&self) -> u64 {
            self.version
        }
    }

    impl Aggregate for Tally {
        type Command = u32;
        type Event = u32;
        type Error = &'static str;

        fn apply(&mut self, event: &Self::Event) {
            self.total += event;
            self.version += 1;
        }

        fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
            match command {
                0 => Ok(vec![]),
                n if *n > 100 => Err("too large"),
                n => Ok(vec![*n, *n]),
            }
        }
    }

    #[test]
    fn applies_every_emitted_event() {
        let mut tally = Tally::default();
        let events = execute(&mut tally, &5).unwrap();
        assert_eq!(events, vec![5, 5]);
        assert_eq!(tally.total, 10);
        assert_eq!(tally.version(), 2);
    }

    #[test]
    fn empty_decision_leaves_state_untouched() {
        let mut tally = Tally::default();
        assert!(execute(&mut tally, &0).unwrap().is_empty());
        assert_eq!(tally.version(), 0);
    }

    #[test]
    fn rejected_command_leaves_state_untouched() {
        let mut tally = Tally::default();
        assert_eq!(execute(&mut tally, &500).unwrap_err(), "too large");
        assert_eq!(tally.total, 0);
    }
}
