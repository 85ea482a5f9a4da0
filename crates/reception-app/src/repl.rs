//! Terminal conversation with the assistant.
//!
//! Every line is one visitor message. Lines starting with `/` are
//! commands: `/contexto` prints the tracked context, `/reiniciar` resets
//! it, `/sair` ends the conversation.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use reception_chat::{summarize, ReceptionOrchestrator};

pub async fn run<R, W>(
    orchestrator: &ReceptionOrchestrator,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (session_id, welcome) = orchestrator
        .start_session()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    output
        .write_all(format!("LEAP AI: {}\n", welcome).as_bytes())
        .await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let text = match line {
            "/sair" | "/quit" => break,
            "/contexto" => match orchestrator.context(session_id) {
                Ok(ctx) => summarize(&ctx).trim_start().to_string(),
                Err(e) => format!("[erro] {}", e),
            },
            "/reiniciar" => match orchestrator.reset_context(session_id) {
                Ok(_) => "[contexto reiniciado]".to_string(),
                Err(e) => format!("[erro] {}", e),
            },
            message => match orchestrator.handle_message(message, Some(session_id)).await {
                Ok(reply) => {
                    tracing::debug!(
                        intent = %reply.intent,
                        stage = %reply.context.stage(),
                        "Turn complete"
                    );
                    format!("LEAP AI: {}", reply.reply)
                }
                Err(e) => format!("[erro] {}", e),
            },
        };
        output.write_all(text.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    output.write_all("Até logo! 👋\n".as_bytes()).await?;
    output.flush().await
}
