use crate::state::Context;

/// Configure pipeline parameters (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn config(
    ctx: Context<'_>,
    #[description = "max_section_len | chunk_threshold | section_concurrency | collaborator_timeout_secs"]
    param: Option<String>,
    #[description = "New value"] value: Option<u32>,
) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    if !ctx.data().is_admin(user_id) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    match (param.as_deref(), value) {
        // Show current config
        (None, _) => {
            let config = ctx.data().pipeline_config().await;
            ctx.say(format!(
                "**Pipeline Configuration:**\n\
                 `max_section_len`: {}\n\
                 `chunk_threshold`: {}\n\
                 `section_concurrency`: {}\n\
                 `collaborator_timeout_secs`: {}",
                config.max_section_len,
                config.chunk_threshold,
                config.section_concurrency,
                config.collaborator_timeout_secs
            ))
            .await?;
        }
        (Some(_), Some(0)) => {
            ctx.say("Values must be at least 1.").await?;
        }
        // Set a parameter
        (Some(key), Some(val)) => {
            let mut config = ctx.data().config.write().await;
            match key {
                "max_section_len" => config.max_section_len = val as usize,
                "chunk_threshold" => config.chunk_threshold = val as usize,
                "section_concurrency" => config.section_concurrency = val as usize,
                "collaborator_timeout_secs" => config.collaborator_timeout_secs = val as u64,
                _ => {
                    drop(config);
                    ctx.say(format!(
                        "Unknown param `{}`. Valid: `max_section_len`, `chunk_threshold`, `section_concurrency`, `collaborator_timeout_secs`",
                        key
                    ))
                    .await?;
                    return Ok(());
                }
            }
            drop(config);
            ctx.say(format!("`{}` set to {}", key, val)).await?;
        }
        (Some(_), None) => {
            ctx.say("Provide both `param` and `value`. Example: `/bias config section_concurrency 8`")
                .await?;
        }
    }

    Ok(())
}
