use alloc::{collections::VecDeque, string::String};

use crate::{Annotation, ElementId, ElementType, Metadata, ParseEvent};

/// Events produced by parser steps and not yet handed to the caller.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    events: VecDeque<ParseEvent>,
}

impl EventQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(any(test, feature = "fuzzing"))]
    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn pop(&mut self) -> Option<ParseEvent> {
        self.events.pop_front()
    }

    pub(crate) fn begin(
        &mut self,
        element_type: ElementType,
        element_id: ElementId,
        metadata: Option<Metadata>,
    ) {
        tracing::trace!(%element_id, %element_type, "begin element");
        self.events.push_back(ParseEvent::Begin {
            element_type,
            element_id,
            metadata,
        });
    }

    pub(crate) fn delta(&mut self, element_id: ElementId, content: impl Into<String>) {
        let content = content.into();
        if content.is_empty() {
            return;
        }
        self.events
            .push_back(ParseEvent::Delta { element_id, content });
    }

    pub(crate) fn end(&mut self, element_id: ElementId, final_content: impl Into<String>) {
        let final_content = final_content.into();
        tracing::trace!(%element_id, len = final_content.len(), "end element");
        self.events.push_back(ParseEvent::End {
            element_id,
            final_content,
        });
    }

    pub(crate) fn annotate(&mut self, element_id: ElementId, annotation: Annotation) {
        self.events
            .push_back(ParseEvent::Annotation { element_id, annotation });
    }
}
