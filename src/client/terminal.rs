use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::chat::{ChatEntry, ChatForm, ChatSurface, NutritionChatClient, Role};

/// Prints entries to stdout as they are appended.
pub struct TerminalSurface;

impl TerminalSurface {
    pub fn format(entry: &ChatEntry) -> String {
        let prefix = match entry.role {
            Role::User => "you> ",
            Role::Bot => "bot> ",
        };
        entry
            .text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    format!("{}{}", prefix, line)
                } else {
                    format!("     {}", line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ChatSurface for TerminalSurface {
    fn show(&self, entry: &ChatEntry) {
        let mut out = std::io::stdout().lock();
        // a closed stdout only loses display, the log keeps the entry
        let _ = writeln!(out, "{}", Self::format(entry));
        let _ = out.flush();
    }
}

/// Reads `<food>` or `<food> | <grams>` lines from stdin until EOF or
/// `/quit`. Each line is looked up in its own task so a slow reply never
/// blocks the next question.
pub async fn run(client: Arc<NutritionChatClient>) -> anyhow::Result<()> {
    run_from(client, BufReader::new(tokio::io::stdin())).await
}

/// Chat loop over any line source. Invalid UTF-8 is decoded lossily. A read
/// error stops reading, but every lookup already begun still gets its reply
/// before the error is returned.
pub async fn run_from<R>(client: Arc<NutritionChatClient>, mut input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut in_flight = JoinSet::new();
    let mut buf = Vec::new();

    let result = loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf).await {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "stopped reading input");
                break Err(e);
            }
        }
        let line = String::from_utf8_lossy(&buf);
        if matches!(line.trim(), "/quit" | "/exit") {
            break Ok(());
        }
        let mut form = ChatForm::from_line(&line);
        if let Some(lookup) = client.begin(&mut form) {
            in_flight.spawn(lookup.run());
        }
    };

    if !in_flight.is_empty() {
        info!(pending = in_flight.len(), "waiting for outstanding lookups");
    }
    while in_flight.join_next().await.is_some() {}
    result?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::chat::ChatLog;
    use crate::client::protocol::{NutritionQuery, NutritionReply};
    use crate::client::transport::{ClientError, NutritionTransport};
    use async_trait::async_trait;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;
    use tokio::io::{AsyncRead, ReadBuf};

    /// Answers every query with its own name after a short delay.
    struct Echo;

    #[async_trait]
    impl NutritionTransport for Echo {
        async fn lookup(&self, q: &NutritionQuery) -> Result<NutritionReply, ClientError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(NutritionReply::Failure {
                message: Some(format!("re: {}", q.query)),
            })
        }
    }

    fn client() -> Arc<NutritionChatClient> {
        Arc::new(NutritionChatClient::new(Arc::new(Echo), ChatLog::new()))
    }

    fn texts(c: &NutritionChatClient) -> Vec<(Role, String)> {
        c.log().entries().into_iter().map(|e| (e.role, e.text)).collect()
    }

    /// Yields `data`, then fails every read.
    struct Broken {
        data: &'static [u8],
    }

    impl AsyncRead for Broken {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.data.is_empty() {
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "pipe gone")));
            }
            let n = self.data.len().min(buf.remaining());
            buf.put_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_the_session() {
        let c = client();
        run_from(c.clone(), &b"apple\n\xff\nbanana\n"[..]).await.unwrap();

        let entries = texts(&c);
        let users: Vec<_> = entries.iter().filter(|(r, _)| *r == Role::User).collect();
        let bots: Vec<_> = entries[1..].iter().filter(|(r, _)| *r == Role::Bot).collect();
        assert_eq!(users.len(), 3);
        assert_eq!(bots.len(), 3);
        assert_eq!(users[0].1, "apple");
        assert_eq!(users[1].1, "\u{FFFD}");
        assert_eq!(users[2].1, "banana");
        assert!(bots.iter().any(|(_, t)| t == "re: banana"));
    }

    #[tokio::test]
    async fn read_error_waits_for_pending_lookups() {
        let c = client();
        let input = BufReader::new(Broken {
            data: b"apple\nbanana\n",
        });
        assert!(run_from(c.clone(), input).await.is_err());

        let mut bots: Vec<_> = texts(&c)
            .into_iter()
            .skip(1)
            .filter(|(r, _)| *r == Role::Bot)
            .map(|(_, t)| t)
            .collect();
        bots.sort();
        assert_eq!(bots, vec!["re: apple", "re: banana"]);
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let c = client();
        run_from(c.clone(), &b"milk\n/quit\nrice\n"[..]).await.unwrap();
        let users: Vec<_> = texts(&c)
            .into_iter()
            .filter(|(r, _)| *r == Role::User)
            .map(|(_, t)| t)
            .collect();
        assert_eq!(users, vec!["milk"]);
    }

    #[test]
    fn multi_line_entries_are_indented() {
        let entry = ChatEntry {
            role: Role::Bot,
            text: "Chicken Breast (150g)\nCalories:248 Protein:46 Carbs:0 Fat:5".into(),
        };
        assert_eq!(
            TerminalSurface::format(&entry),
            "bot> Chicken Breast (150g)\n     Calories:248 Protein:46 Carbs:0 Fat:5"
        );
    }

    #[test]
    fn user_entries_are_prefixed() {
        let entry = ChatEntry {
            role: Role::User,
            text: "banana".into(),
        };
        assert_eq!(TerminalSurface::format(&entry), "you> banana");
    }
}
