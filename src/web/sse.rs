use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use super::state::{AppState, DatasetEvent};

pub async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let rx = state.tx.subscribe();
    let stream = BroadcastStream::new(rx);

    let stream = stream.filter_map(|result| match result {
        Ok(event) => Some(Ok(Event::default()
            .event("dataset")
            .data(render_event(&event)))),
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn render_event(e: &DatasetEvent) -> String {
    let class = if e.ok { "event-ok" } else { "event-failed" };
    format!(
        r#"<p class="{}"><strong>{}</strong>: {} <a href="/">refresh</a></p>"#,
        class,
        html_escape(&e.source),
        html_escape(&e.message),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
