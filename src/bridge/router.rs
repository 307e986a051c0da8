use crate::bridge::messages::{AssistantEvent, AssistantRequest, AssistantResponse};
use crate::dom::page_model::PageDocument;
use crate::session::assistant::{Assistant, StatusSink};

/// Dispatch one boundary message against the session. `primary` says whether
/// this context is the page's primary document; activation is refused
/// anywhere else.
pub fn handle_request(
    assistant: &mut Assistant,
    doc: &mut PageDocument,
    primary: bool,
    request: AssistantRequest,
) -> AssistantResponse {
    match request {
        AssistantRequest::Ping => AssistantResponse::Pong { pong: true },

        AssistantRequest::StartAssistant => {
            if !primary {
                return AssistantResponse::Started {
                    success: false,
                    reason: Some("not primary document context".to_string()),
                };
            }
            if !assistant.is_active() {
                assistant.start(doc);
            }
            AssistantResponse::Started {
                success: true,
                reason: None,
            }
        }

        AssistantRequest::StopAssistant => {
            if primary {
                assistant.stop();
            }
            AssistantResponse::Stopped { success: true }
        }

        AssistantRequest::SummarizePage { payload, mode } => {
            match assistant.summarize(&payload, mode) {
                Ok(summary) => AssistantResponse::Summary {
                    ok: true,
                    summary: Some(summary),
                    error: None,
                },
                Err(e) => AssistantResponse::Summary {
                    ok: false,
                    summary: None,
                    error: Some(e.to_string()),
                },
            }
        }
    }
}

/// Status sink that buffers emitted events behind a shared handle; the
/// observer side drains at its own pace, and a missing observer loses
/// nothing but the notification itself.
#[derive(Clone, Default)]
pub struct BufferedStatus {
    events: std::rc::Rc<std::cell::RefCell<Vec<AssistantEvent>>>,
}

impl BufferedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<AssistantEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .map(|e| match e {
                AssistantEvent::StatusUpdate { text } => text.clone(),
            })
            .collect()
    }
}

impl StatusSink for BufferedStatus {
    fn status(&mut self, text: &str) {
        self.events.borrow_mut().push(AssistantEvent::StatusUpdate {
            text: text.to_string(),
        });
    }
}
