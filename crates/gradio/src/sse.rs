//! Just enough of the server-sent-events format to read a Gradio result
//! stream: `event:` and `data:` fields, blank-line terminated.

/// A single dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name; `message` when the server sent no `event:` field.
    pub event: String,
    /// `data:` lines joined with `\n`.
    pub data: String,
}

const DEFAULT_EVENT: &str = "message";

/// Split a complete event-stream body into events.
///
/// Comment lines (leading `:`) and unknown fields are ignored. A trailing
/// event without a terminating blank line is still returned.
pub fn parse_events(body: &str) -> Vec<SseEvent> {
    let mut events = Vec::new();
    let mut event: Option<String> = None;
    let mut data: Vec<&str> = Vec::new();

    for line in body.lines() {
        if line.is_empty() {
            flush(&mut events, &mut event, &mut data);
            continue;
        }
        if line.starts_with(':') {
            continue;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }
    flush(&mut events, &mut event, &mut data);

    events
}

fn flush(events: &mut Vec<SseEvent>, event: &mut Option<String>, data: &mut Vec<&str>) {
    if event.is_none() && data.is_empty() {
        return;
    }
    events.push(SseEvent {
        event: event.take().unwrap_or_else(|| DEFAULT_EVENT.to_string()),
        data: data.join("\n"),
    });
    data.clear();
}
