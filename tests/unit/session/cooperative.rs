use super::*;

#[derive(Default)]
struct CountingHost {
    calls: u32,
}

impl HostYield for CountingHost {
    fn yield_to_host(&mut self) {
        self.calls += 1;
    }
}

#[test]
fn checkpoint_yields_to_host_each_time() {
    let mut host = CountingHost::default();
    {
        let mut coop = Cooperative::new(&mut host, CancellationToken::new());
        coop.checkpoint().unwrap();
        coop.checkpoint().unwrap();
        assert_eq!(coop.yields(), 2);
    }
    assert_eq!(host.calls, 2);
}

#[test]
fn cancellation_is_observed_at_next_checkpoint() {
    let token = CancellationToken::new();
    let mut coop = Cooperative::new(ThreadYield, token.clone());
    coop.checkpoint().unwrap();

    token.cancel();
    assert!(coop.token().is_cancelled());
    assert!(matches!(coop.checkpoint(), Err(ChromaError::Cancelled)));
}

#[test]
fn detached_scheduler_is_not_cancelled() {
    let mut coop = Cooperative::detached();
    assert!(coop.checkpoint().is_ok());
}
