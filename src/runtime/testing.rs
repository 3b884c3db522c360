//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O or wall-clock
//! timers.

use super::traits::*;
use super::{CallView, ChatRuntime, RuntimeEvent, RuntimeHandle, UiEvent};
use crate::call::CallTimer;
use crate::config::AppConfig;
use crate::llm::LlmError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

// ============================================================================
// Mock Completion Client
// ============================================================================

/// Mock completion client that returns queued responses
#[allow(dead_code)]
pub struct MockCompletionClient {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Record of all prompts sent
    pub prompts: Mutex<Vec<String>>,
    /// Never answer; requests stay in flight until dropped
    hang: AtomicBool,
    /// Set once an in-flight request was dropped before answering
    abandoned: AtomicBool,
}

/// Raises its flag when the owning future is dropped
struct DropFlag<'a>(&'a AtomicBool);

impl Drop for DropFlag<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[allow(dead_code)]
impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            hang: AtomicBool::new(false),
            abandoned: AtomicBool::new(false),
        }
    }

    /// Make every completion wait forever
    pub fn hang(&self) {
        self.hang.store(true, Ordering::SeqCst);
    }

    /// Whether a hanging completion was dropped by its caller
    pub fn was_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }

    /// Queue a successful completion
    pub fn queue_text(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(text.to_string()));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded prompts
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.hang.load(Ordering::SeqCst) {
            let _flag = DropFlag(&self.abandoned);
            return std::future::pending().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::transport("No mock response queued")))
    }
}

// ============================================================================
// Manual Scheduler
// ============================================================================

struct ScheduledTimer {
    request: TimerRequest,
    tx: mpsc::Sender<RuntimeEvent>,
    token: CancellationToken,
    fired: bool,
}

/// Scheduler whose timers only fire when a test says so
#[derive(Clone, Default)]
pub struct ManualScheduler {
    timers: Arc<Mutex<Vec<ScheduledTimer>>>,
}

#[allow(dead_code)]
impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers that are scheduled and neither cancelled nor spent
    pub fn pending(&self) -> Vec<CallTimer> {
        self.timers
            .lock()
            .unwrap()
            .iter()
            .filter(|t| !t.fired && !t.token.is_cancelled())
            .map(|t| t.request.timer)
            .collect()
    }

    /// Every request ever scheduled, cancelled or not
    pub fn requests(&self) -> Vec<TimerRequest> {
        self.timers
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.request)
            .collect()
    }

    /// Fire the live timer of this kind once. Returns false when there is
    /// none (never scheduled, cancelled, or a one-shot that already fired).
    pub async fn fire(&self, timer: CallTimer) -> bool {
        let (tx, event) = {
            let mut timers = self.timers.lock().unwrap();
            let Some(entry) = timers
                .iter_mut()
                .rev()
                .find(|t| t.request.timer == timer && !t.fired && !t.token.is_cancelled())
            else {
                return false;
            };
            if !entry.request.repeat {
                entry.fired = true;
            }
            (entry.tx.clone(), entry.request.event())
        };
        tx.send(event).await.is_ok()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(
        &self,
        request: TimerRequest,
        tx: mpsc::Sender<RuntimeEvent>,
    ) -> CancellationToken {
        let token = CancellationToken::new();
        self.timers.lock().unwrap().push(ScheduledTimer {
            request,
            tx,
            token: token.clone(),
            fired: false,
        });
        token
    }
}

// ============================================================================
// Test Runtime Builder
// ============================================================================

/// Helper for building test runtimes with minimal boilerplate
pub struct TestRuntime {
    pub handle: RuntimeHandle,
    pub ui_rx: broadcast::Receiver<UiEvent>,
    pub client: Arc<MockCompletionClient>,
    pub scheduler: ManualScheduler,
    runtime_task: tokio::task::JoinHandle<()>,
}

#[allow(dead_code)]
impl TestRuntime {
    pub fn new() -> TestRuntimeBuilder {
        TestRuntimeBuilder::new()
    }

    /// Wait for the runtime task to finish cleanly
    pub async fn join(&mut self, timeout: Duration) -> bool {
        matches!(
            tokio::time::timeout(timeout, &mut self.runtime_task).await,
            Ok(Ok(()))
        )
    }

    /// Wait for the first UI event matching `pred`
    pub async fn wait_for<F>(&mut self, timeout: Duration, mut pred: F) -> Option<UiEvent>
    where
        F: FnMut(&UiEvent) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.ui_rx.recv()).await {
                Ok(Ok(event)) if pred(&event) => return Some(event),
                _ => continue,
            }
        }
        None
    }

    /// Wait for a call snapshot matching `pred`
    pub async fn wait_for_call<F>(&mut self, mut pred: F) -> Option<CallView>
    where
        F: FnMut(&CallView) -> bool,
    {
        match self
            .wait_for(Duration::from_secs(2), |e| {
                matches!(e, UiEvent::CallUpdated { call } if pred(call))
            })
            .await
        {
            Some(UiEvent::CallUpdated { call }) => Some(call),
            _ => None,
        }
    }

    /// Wait until the chat is idle again
    pub async fn wait_for_idle(&mut self) -> bool {
        self.wait_for(Duration::from_secs(2), |e| {
            matches!(e, UiEvent::ChatStateChanged { state } if !state.is_busy())
        })
        .await
        .is_some()
    }

    /// Collect all appended messages until the chat goes idle
    pub async fn collect_until_idle(&mut self) -> Vec<crate::conversation::Message> {
        let mut collected = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.ui_rx.recv()).await {
                Ok(Ok(UiEvent::MessagesAppended { messages })) => collected.extend(messages),
                Ok(Ok(UiEvent::ChatStateChanged { state })) if !state.is_busy() => break,
                _ => continue,
            }
        }
        collected
    }
}

impl Drop for TestRuntime {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

pub struct TestRuntimeBuilder {
    client: Option<MockCompletionClient>,
    config: AppConfig,
}

#[allow(dead_code)]
impl TestRuntimeBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.chat.reply_delay = Duration::ZERO;
        config.community_url = "https://community.example".to_string();
        Self {
            client: None,
            config,
        }
    }

    pub fn client(mut self, client: MockCompletionClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn reply_delay(mut self, delay: Duration) -> Self {
        self.config.chat.reply_delay = delay;
        self
    }

    pub fn build(self) -> TestRuntime {
        let client = Arc::new(self.client.unwrap_or_default());
        let scheduler = ManualScheduler::new();

        let (runtime, handle) = ChatRuntime::new(&self.config, client.clone(), scheduler.clone());
        let ui_rx = handle.subscribe();

        let join = tokio::spawn(async move {
            runtime.run().await;
        });

        TestRuntime {
            handle,
            ui_rx,
            client,
            scheduler,
            runtime_task: join,
        }
    }
}

impl Default for TestRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::CallPhase;
    use crate::call::script::TRANSCRIPT_SCRIPT;
    use crate::conversation::Role;
    use crate::reply::{CONNECT_PROMPT, SAFETY_FACT};

    async fn open_live_call(rt: &mut TestRuntime) {
        rt.handle.connect().await.unwrap();
        assert!(rt
            .wait_for_call(|c| c.phase == CallPhase::Connecting)
            .await
            .is_some());
        assert!(rt.scheduler.fire(CallTimer::Connect).await);
        assert!(rt.wait_for_call(|c| c.phase == CallPhase::Live).await.is_some());
    }

    #[tokio::test]
    async fn test_mock_completion_client() {
        let mock = MockCompletionClient::new();
        mock.queue_text("Hello");
        mock.queue_error(LlmError::auth("bad key"));

        assert_eq!(mock.complete("one").await.unwrap(), "Hello");
        assert!(mock.complete("two").await.is_err());
        assert!(mock.complete("three").await.is_err());
        assert_eq!(mock.recorded_prompts(), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_manual_scheduler_respects_cancellation() {
        let scheduler = ManualScheduler::new();
        let (tx, mut rx) = mpsc::channel(8);

        let token = scheduler.schedule(
            TimerRequest {
                timer: CallTimer::Progress,
                delay: Duration::from_millis(500),
                repeat: true,
                session: 1,
            },
            tx.clone(),
        );
        scheduler.schedule(
            TimerRequest {
                timer: CallTimer::Connect,
                delay: Duration::from_millis(2000),
                repeat: false,
                session: 1,
            },
            tx,
        );

        assert!(scheduler.fire(CallTimer::Progress).await);
        assert!(scheduler.fire(CallTimer::Progress).await);
        assert!(scheduler.fire(CallTimer::Connect).await);
        assert!(!scheduler.fire(CallTimer::Connect).await);

        token.cancel();
        assert!(!scheduler.fire(CallTimer::Progress).await);
        assert!(scheduler.pending().is_empty());

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 3);
    }

    #[tokio::test]
    async fn test_init_carries_welcome_message() {
        let mut rt = TestRuntime::new().build();
        let init = rt
            .wait_for(Duration::from_secs(2), |e| matches!(e, UiEvent::Init { .. }))
            .await;
        match init {
            Some(UiEvent::Init { messages, state }) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].offer_community_link);
                assert!(messages[0].content.is_rich());
                assert!(!state.is_busy());
            }
            other => panic!("Expected Init, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_safety_question_gets_canned_fact() {
        let mut rt = TestRuntime::new().build();
        rt.handle
            .send_message("Can I run vancomycin and zosyn on the same IV line?")
            .await
            .unwrap();

        let msgs = rt.collect_until_idle().await;
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[1].text(), SAFETY_FACT);
        assert_eq!(msgs[2].text(), CONNECT_PROMPT);
        assert!(msgs[2].offer_connect);
        assert!(rt.client.recorded_prompts().is_empty());
    }

    #[tokio::test]
    async fn test_general_question_uses_completion() {
        let client = MockCompletionClient::new();
        client.queue_text("\n\nAdults: 325-650 mg every 4-6 hours.");

        let mut rt = TestRuntime::new().client(client).build();
        rt.handle
            .send_message("What's the dosing for acetaminophen?")
            .await
            .unwrap();

        let msgs = rt.collect_until_idle().await;
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[1].role, Role::Assistant);
        assert_eq!(msgs[1].text(), "Adults: 325-650 mg every 4-6 hours.");
        assert!(msgs[2].offer_connect);
        assert_eq!(
            rt.client.recorded_prompts(),
            vec!["What's the dosing for acetaminophen?"]
        );
    }

    #[tokio::test]
    async fn test_completion_failure_appends_error_turn() {
        let client = MockCompletionClient::new();
        client.queue_error(LlmError::transport("connection refused"));

        let mut rt = TestRuntime::new().client(client).build();
        rt.handle.send_message("Hello?").await.unwrap();

        let msgs = rt.collect_until_idle().await;
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[1].role, Role::Assistant);
        assert!(!msgs[1].offer_connect);
    }

    #[tokio::test]
    async fn test_blank_message_is_silent() {
        let mut rt = TestRuntime::new().build();
        rt.handle.send_message("   ").await.unwrap();

        let event = rt
            .wait_for(Duration::from_millis(200), |e| {
                !matches!(e, UiEvent::Init { .. })
            })
            .await;
        assert!(event.is_none(), "blank input produced {event:?}");
    }

    #[tokio::test]
    async fn test_second_message_while_busy_is_rejected() {
        let mut rt = TestRuntime::new()
            .reply_delay(Duration::from_millis(300))
            .build();
        rt.handle
            .send_message("vancomycin zosyn compatible?")
            .await
            .unwrap();
        rt.handle.send_message("hello again").await.unwrap();

        let error = rt
            .wait_for(Duration::from_secs(2), |e| matches!(e, UiEvent::Error { .. }))
            .await;
        assert!(error.is_some());

        // The first turn was already drained above; only the reply remains
        let msgs = rt.collect_until_idle().await;
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].text(), SAFETY_FACT);
        assert!(msgs.iter().all(|m| m.role == Role::Assistant));
    }

    #[tokio::test]
    async fn test_call_lifecycle() {
        let mut rt = TestRuntime::new().build();
        rt.handle.connect().await.unwrap();

        let call = rt
            .wait_for_call(|c| c.phase == CallPhase::Connecting)
            .await
            .unwrap();
        assert_eq!(call.progress, 0);
        assert_eq!(call.title, "Connecting to Preceptor");

        assert!(rt.scheduler.fire(CallTimer::Progress).await);
        let call = rt.wait_for_call(|c| c.progress == 25).await.unwrap();
        assert_eq!(call.status_line, "Initializing video stream...");

        assert!(rt.scheduler.fire(CallTimer::Connect).await);
        let call = rt
            .wait_for_call(|c| c.phase == CallPhase::Live)
            .await
            .unwrap();
        assert_eq!(call.title, "Connected with Preceptor Sarah");

        for i in 1..=TRANSCRIPT_SCRIPT.len() {
            assert!(rt.scheduler.fire(CallTimer::Transcript).await);
            assert!(rt
                .wait_for_call(|c| c.transcript.len() == i)
                .await
                .is_some());
        }
        // Script exhausted cancels the ticker
        assert!(!rt.scheduler.fire(CallTimer::Transcript).await);

        rt.handle.end_call().await.unwrap();
        let call = rt
            .wait_for_call(|c| c.phase == CallPhase::Summary)
            .await
            .unwrap();
        let summary = call.summary.unwrap();
        assert_eq!(summary.community_url, "https://community.example");
        assert_eq!(call.transcript.len(), TRANSCRIPT_SCRIPT.len());
        assert!(rt.scheduler.pending().is_empty());

        rt.handle.close_call().await.unwrap();
        assert!(rt
            .wait_for(Duration::from_secs(2), |e| matches!(e, UiEvent::CallClosed))
            .await
            .is_some());
        assert!(rt
            .wait_for(Duration::from_secs(2), |e| {
                matches!(e, UiEvent::ChatStateChanged { state } if !state.call_open)
            })
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_end_call_mid_schedule_stops_transcript() {
        let mut rt = TestRuntime::new().build();
        open_live_call(&mut rt).await;

        assert!(rt.scheduler.fire(CallTimer::Transcript).await);
        assert!(rt.wait_for_call(|c| c.transcript.len() == 1).await.is_some());

        rt.handle.end_call().await.unwrap();
        let call = rt
            .wait_for_call(|c| c.phase == CallPhase::Summary)
            .await
            .unwrap();
        assert_eq!(call.transcript.len(), 1);

        for timer in [
            CallTimer::Transcript,
            CallTimer::Progress,
            CallTimer::CounterpartFeed,
            CallTimer::SelfFeed,
        ] {
            assert!(!rt.scheduler.fire(timer).await, "{timer:?} still live");
        }
    }

    #[tokio::test]
    async fn test_immediate_end_gives_empty_summary() {
        let mut rt = TestRuntime::new().build();
        rt.handle.connect().await.unwrap();
        assert!(rt
            .wait_for_call(|c| c.phase == CallPhase::Connecting)
            .await
            .is_some());

        rt.handle.end_call().await.unwrap();
        let call = rt
            .wait_for_call(|c| c.phase == CallPhase::Summary)
            .await
            .unwrap();
        assert!(call.transcript.is_empty());
        assert_eq!(call.progress, 0);
        assert!(call.summary.is_some());
        assert!(!rt.scheduler.fire(CallTimer::Progress).await);
        assert!(!rt.scheduler.fire(CallTimer::Connect).await);
    }

    #[tokio::test]
    async fn test_toggles_during_live_call() {
        let mut rt = TestRuntime::new().build();
        open_live_call(&mut rt).await;

        rt.handle.toggle_mute().await.unwrap();
        assert!(rt.wait_for_call(|c| c.muted).await.is_some());

        rt.handle.toggle_video().await.unwrap();
        let call = rt.wait_for_call(|c| !c.video_enabled).await.unwrap();
        assert!(call.self_clip.is_none());
    }

    #[tokio::test]
    async fn test_learning_resources_from_summary() {
        let mut rt = TestRuntime::new().build();
        open_live_call(&mut rt).await;
        rt.handle.end_call().await.unwrap();
        assert!(rt
            .wait_for_call(|c| c.phase == CallPhase::Summary)
            .await
            .is_some());

        rt.handle.open_learning_resources().await.unwrap();
        let event = rt
            .wait_for(Duration::from_secs(2), |e| {
                matches!(e, UiEvent::LearningResources { .. })
            })
            .await;
        match event {
            Some(UiEvent::LearningResources { resources }) => assert_eq!(resources.len(), 5),
            other => panic!("Expected resources, got {other:?}"),
        }

        rt.handle.close_learning_resources().await.unwrap();
        assert!(rt
            .wait_for(Duration::from_secs(2), |e| {
                matches!(e, UiEvent::LearningResourcesClosed)
            })
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_dismiss_while_connecting_tears_down_timers() {
        let mut rt = TestRuntime::new().build();
        rt.handle.connect().await.unwrap();
        assert!(rt
            .wait_for_call(|c| c.phase == CallPhase::Connecting)
            .await
            .is_some());
        assert_eq!(rt.scheduler.pending().len(), 2);

        rt.handle.dismiss_call().await.unwrap();
        assert!(rt
            .wait_for(Duration::from_secs(2), |e| matches!(e, UiEvent::CallClosed))
            .await
            .is_some());
        assert!(rt.scheduler.pending().is_empty());

        // A fresh call can be opened afterwards
        rt.handle.connect().await.unwrap();
        assert!(rt
            .wait_for_call(|c| c.phase == CallPhase::Connecting)
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_call_controls_without_call_report_error() {
        let mut rt = TestRuntime::new().build();
        rt.handle.toggle_mute().await.unwrap();
        assert!(rt
            .wait_for(Duration::from_secs(2), |e| matches!(e, UiEvent::Error { .. }))
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_chat_keeps_working_during_call() {
        let client = MockCompletionClient::new();
        client.queue_text("Sure.");

        let mut rt = TestRuntime::new().client(client).build();
        open_live_call(&mut rt).await;

        rt.handle.send_message("Quick question").await.unwrap();
        let msgs = rt.collect_until_idle().await;
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[1].text(), "Sure.");
    }

    #[tokio::test]
    async fn test_shutdown_stops_runtime() {
        let mut rt = TestRuntime::new().build();
        rt.handle.shutdown();
        assert!(rt.join(Duration::from_secs(2)).await);
        assert!(rt.handle.send_message("hello").await.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_cancels_call_timers() {
        let mut rt = TestRuntime::new().build();
        rt.handle.connect().await.unwrap();
        assert!(rt
            .wait_for_call(|c| c.phase == CallPhase::Connecting)
            .await
            .is_some());
        assert_eq!(
            rt.scheduler.pending(),
            vec![CallTimer::Progress, CallTimer::Connect]
        );

        rt.handle.shutdown();
        assert!(rt.join(Duration::from_secs(2)).await);
        assert!(rt.scheduler.pending().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_abandons_reply_in_flight() {
        let client = MockCompletionClient::new();
        client.hang();

        let mut rt = TestRuntime::new().client(client).build();
        rt.handle.send_message("Hello?").await.unwrap();
        assert!(rt
            .wait_for(Duration::from_secs(2), |e| {
                matches!(e, UiEvent::ChatStateChanged { state } if state.is_busy())
            })
            .await
            .is_some());

        // The completion has started before shutdown lands
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while rt.client.recorded_prompts().is_empty() {
            assert!(tokio::time::Instant::now() < deadline, "completion never started");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        rt.handle.shutdown();
        assert!(rt.join(Duration::from_secs(2)).await);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while !rt.client.was_abandoned() {
            assert!(tokio::time::Instant::now() < deadline, "reply task still running");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        // Neither a reply nor a failure turn reached the transcript
        let appended = rt
            .wait_for(Duration::from_millis(200), |e| {
                matches!(e, UiEvent::MessagesAppended { messages }
                    if messages.iter().any(|m| m.role == Role::Assistant))
            })
            .await;
        assert!(appended.is_none(), "reply delivered after shutdown: {appended:?}");
    }

    #[tokio::test]
    async fn test_timer_from_dismissed_call_does_not_reach_new_call() {
        let mut rt = TestRuntime::new().build();
        rt.handle.connect().await.unwrap();
        assert!(rt
            .wait_for_call(|c| c.phase == CallPhase::Connecting)
            .await
            .is_some());
        let stale_connect = rt
            .scheduler
            .requests()
            .into_iter()
            .find(|r| r.timer == CallTimer::Connect)
            .unwrap();

        rt.handle.dismiss_call().await.unwrap();
        assert!(rt
            .wait_for(Duration::from_secs(2), |e| matches!(e, UiEvent::CallClosed))
            .await
            .is_some());
        rt.handle.connect().await.unwrap();
        assert!(rt
            .wait_for_call(|c| c.phase == CallPhase::Connecting)
            .await
            .is_some());

        // Fired just before the dismiss cancelled it, delivered after the reopen
        rt.handle.send(stale_connect.event()).await.unwrap();
        assert!(rt.scheduler.fire(CallTimer::Progress).await);
        let call = rt.wait_for_call(|c| c.progress == 25).await.unwrap();
        assert_eq!(call.phase, CallPhase::Connecting);

        assert!(rt.scheduler.fire(CallTimer::Connect).await);
        assert!(rt.wait_for_call(|c| c.phase == CallPhase::Live).await.is_some());
    }
}
