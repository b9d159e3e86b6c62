//! End-to-end tests of the attendee registration flow against in-process stores.

use async_trait::async_trait;
use cerimonia_core::{
    Attendee, AttendeeStore, Clipboard, ClipboardError, Cpf, Event, FlowState, MemoryStore,
    NewAttendee, Notice, OptinStore, PrimaryAction, RegistrationFlow, SignupService, StoreError,
    Stores,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

const CPF: &str = "11144477735";
const DISPLAY: &str = "111.444.777-35";

fn event() -> Event {
    Event {
        id: "evt-1".into(),
        name: "Cerimônia de Lua Cheia".into(),
        location: "Alto Paraíso".into(),
        datetime: Utc::now(),
        pix_key: Some("condutor@example.com".into()),
        image_url: None,
        guests: None,
        admin_id: Some("admin-1".into()),
    }
}

async fn seeded_store(cpfs: &[&str]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.insert_event(event()).await;
    for cpf in cpfs {
        let new = NewAttendee::new(cpf, "Participante Teste", None).unwrap();
        AttendeeStore::create(store.as_ref(), new).await.unwrap();
    }
    store
}

/// Attendee store whose lookups fail.
struct UnreachableAttendees;

#[async_trait]
impl AttendeeStore for UnreachableAttendees {
    async fn find_by_cpf(&self, _cpf: &Cpf) -> Result<Option<Attendee>, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn create(&self, _attendee: NewAttendee) -> Result<Attendee, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

/// Attendee store that delays lookups per CPF.
struct SlowAttendees {
    inner: Arc<MemoryStore>,
    delays: HashMap<String, Duration>,
}

#[async_trait]
impl AttendeeStore for SlowAttendees {
    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<Attendee>, StoreError> {
        if let Some(delay) = self.delays.get(cpf.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        self.inner.find_by_cpf(cpf).await
    }

    async fn create(&self, attendee: NewAttendee) -> Result<Attendee, StoreError> {
        AttendeeStore::create(self.inner.as_ref(), attendee).await
    }
}

/// Opt-in store that forgets to report existing rows, as if a concurrent insert landed
/// between the check and the write.
struct RacingOptins {
    inner: Arc<MemoryStore>,
    creates: AtomicUsize,
}

#[async_trait]
impl OptinStore for RacingOptins {
    async fn find(
        &self,
        _event_id: &str,
        _attendee_id: &str,
    ) -> Result<Option<cerimonia_core::EventOptin>, StoreError> {
        Ok(None)
    }

    async fn create(
        &self,
        event_id: &str,
        attendee_id: &str,
    ) -> Result<cerimonia_core::EventOptin, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        OptinStore::create(self.inner.as_ref(), event_id, attendee_id).await
    }

    async fn list_for_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<cerimonia_core::EventOptin>, StoreError> {
        self.inner.list_for_event(event_id).await
    }
}

#[derive(Default)]
struct RecordingClipboard {
    written: Mutex<Vec<String>>,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct DeniedClipboard;

#[async_trait]
impl Clipboard for DeniedClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError("permission denied".into()))
    }
}

#[tokio::test]
async fn test_unknown_cpf_ends_not_found() {
    let store = seeded_store(&[]).await;
    let mut flow = RegistrationFlow::load("evt-1", &Stores::from_backend(store))
        .await
        .unwrap();

    let state = flow.enter_cpf(DISPLAY).await.clone();

    assert!(matches!(state, FlowState::NotFound { .. }));
    assert_eq!(flow.primary_action(), Some(PrimaryAction::SignUp));
    assert_eq!(flow.signup_handoff().map(Cpf::as_str), Some(CPF));
}

#[tokio::test]
async fn test_known_cpf_ends_found() {
    let store = seeded_store(&[CPF]).await;
    let mut flow = RegistrationFlow::load("evt-1", &Stores::from_backend(store))
        .await
        .unwrap();

    let state = flow.enter_cpf(DISPLAY).await.clone();

    assert!(matches!(state, FlowState::Found { .. }));
    assert_eq!(flow.primary_action(), Some(PrimaryAction::Register));
    assert!(flow.signup_handoff().is_none());
}

#[tokio::test]
async fn test_register_then_copy_payment_key() {
    let store = seeded_store(&[CPF]).await;
    let mut flow = RegistrationFlow::load("evt-1", &Stores::from_backend(store.clone()))
        .await
        .unwrap();
    flow.enter_cpf(DISPLAY).await;

    let state = flow.register().await.unwrap().clone();

    assert!(matches!(
        state,
        FlowState::Registered {
            notice: Notice::RegistrationComplete,
            ..
        }
    ));
    assert_eq!(store.optin_count().await, 1);
    assert_eq!(flow.payment_key(), Some("condutor@example.com"));

    let clipboard = RecordingClipboard::default();
    assert_eq!(
        flow.copy_payment_key(&clipboard).await,
        Some(Notice::PaymentKeyCopied)
    );
    assert_eq!(
        clipboard.written.lock().unwrap().clone(),
        vec!["condutor@example.com".to_string()]
    );
}

#[tokio::test]
async fn test_clipboard_failure_is_a_notice() {
    let store = seeded_store(&[CPF]).await;
    let mut flow = RegistrationFlow::load("evt-1", &Stores::from_backend(store))
        .await
        .unwrap();
    flow.enter_cpf(DISPLAY).await;
    flow.register().await.unwrap();

    assert_eq!(
        flow.copy_payment_key(&DeniedClipboard).await,
        Some(Notice::CopyFailed)
    );
    assert!(matches!(flow.state(), FlowState::Registered { .. }));
}

#[tokio::test]
async fn test_duplicate_optin_is_already_registered() {
    let store = seeded_store(&[CPF]).await;
    let attendee = store
        .find_by_cpf(&Cpf::parse(CPF).unwrap())
        .await
        .unwrap()
        .unwrap();
    OptinStore::create(store.as_ref(), "evt-1", &attendee.id)
        .await
        .unwrap();

    let mut flow = RegistrationFlow::load("evt-1", &Stores::from_backend(store.clone()))
        .await
        .unwrap();
    flow.enter_cpf(DISPLAY).await;
    let state = flow.register().await.unwrap().clone();

    assert!(matches!(
        state,
        FlowState::Registered {
            notice: Notice::AlreadyRegistered,
            ..
        }
    ));
    assert_eq!(store.optin_count().await, 1);
    assert_eq!(store.list_for_event("evt-1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_insert_conflict_is_already_registered() {
    let store = seeded_store(&[CPF]).await;
    let racing = Arc::new(RacingOptins {
        inner: store.clone(),
        creates: AtomicUsize::new(0),
    });
    let stores = Stores {
        attendees: store.clone(),
        optins: racing.clone(),
        events: store.clone(),
    };

    let mut first = RegistrationFlow::load("evt-1", &stores).await.unwrap();
    let mut second = RegistrationFlow::load("evt-1", &stores).await.unwrap();
    first.enter_cpf(DISPLAY).await;
    second.enter_cpf(DISPLAY).await;

    first.register().await.unwrap();
    let state = second.register().await.unwrap().clone();

    assert!(matches!(
        state,
        FlowState::Registered {
            notice: Notice::AlreadyRegistered,
            ..
        }
    ));
    assert_eq!(racing.creates.load(Ordering::SeqCst), 2);
    assert_eq!(store.optin_count().await, 1);
}

#[tokio::test]
async fn test_late_lookup_for_superseded_cpf_is_ignored() {
    const SLOW: &str = "11144477735";
    const FAST: &str = "22233344405";

    let store = seeded_store(&[SLOW]).await;
    let attendees = Arc::new(SlowAttendees {
        inner: store.clone(),
        delays: HashMap::from([(SLOW.to_string(), Duration::from_millis(100))]),
    });
    let stores = Stores {
        attendees,
        optins: store.clone(),
        events: store.clone(),
    };
    let mut flow = RegistrationFlow::load("evt-1", &stores).await.unwrap();

    let first = flow.input(SLOW).unwrap();
    let second = flow.input(FAST).unwrap();

    let (tx, mut rx) = mpsc::channel(2);
    for ticket in [first, second] {
        let resolver = flow.resolver().clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(resolver.resolve(ticket).await).await;
        });
    }
    drop(tx);

    let mut arrival = Vec::new();
    while let Some(result) = rx.recv().await {
        arrival.push(result.ticket.cpf().as_str().to_string());
        flow.apply(result);
    }

    // The superseded lookup completed last and must not win.
    assert_eq!(arrival, vec![FAST.to_string(), SLOW.to_string()]);
    assert_eq!(
        flow.state(),
        &FlowState::NotFound {
            cpf: Cpf::parse(FAST).unwrap()
        }
    );
}

#[tokio::test]
async fn test_lookup_failure_routes_to_signup() {
    let store = seeded_store(&[]).await;
    let stores = Stores {
        attendees: Arc::new(UnreachableAttendees),
        optins: store.clone(),
        events: store,
    };
    let mut flow = RegistrationFlow::load("evt-1", &stores).await.unwrap();

    let state = flow.enter_cpf(DISPLAY).await.clone();

    assert!(matches!(state, FlowState::NotFound { .. }));
    assert_eq!(flow.primary_action(), Some(PrimaryAction::SignUp));
}

#[tokio::test]
async fn test_signup_then_register() {
    let store = seeded_store(&[]).await;
    let stores = Stores::from_backend(store.clone());
    let mut flow = RegistrationFlow::load("evt-1", &stores).await.unwrap();

    flow.enter_cpf(DISPLAY).await;
    let cpf = flow.signup_handoff().cloned().unwrap();

    let signup = SignupService::new(stores.attendees.clone());
    let form = NewAttendee::new(cpf.as_str(), "Maria Silva", Some("maria@example.com")).unwrap();
    signup.sign_up(form).await.unwrap();

    // Re-entering the flow now finds the attendee.
    let state = flow.enter_cpf(DISPLAY).await.clone();
    assert!(matches!(state, FlowState::Found { .. }));

    flow.register().await.unwrap();
    assert_eq!(store.optin_count().await, 1);
}
