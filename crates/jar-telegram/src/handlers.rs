//! Command handlers for the Telegram bot.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, ParseMode};
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use jar_models::TimeSlot;

use crate::state::BotState;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and show the keyboard")]
    Start,

    #[command(description = "Get a milestone right now")]
    Milestone,

    #[command(description = "Preview how deliveries read across the day")]
    Test,

    #[command(description = "Show jar statistics")]
    Stats,

    #[command(description = "Show help message")]
    Help,
}

/// Reply-keyboard button labels. Button presses arrive as plain text and
/// are routed to the matching command handler.
pub const MILESTONE_BUTTON: &str = "✨ Milestone";
pub const TEST_BUTTON: &str = "🧪 Test";
pub const HELP_BUTTON: &str = "❓ Help";

fn reply_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new([
        vec![
            KeyboardButton::new(MILESTONE_BUTTON),
            KeyboardButton::new(HELP_BUTTON),
        ],
        vec![KeyboardButton::new(TEST_BUTTON)],
    ])
    .resize_keyboard()
}

/// Whether this chat is the configured recipient. The bot is personal;
/// everyone else is ignored.
fn authorized(msg: &Message, state: &BotState) -> bool {
    if msg.chat.id.0 == state.recipient {
        return true;
    }
    info!(chat_id = %msg.chat.id, "ignoring chat outside the configured recipient");
    false
}

/// Dispatches a parsed command.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    if !authorized(&msg, &state) {
        return Ok(());
    }

    match cmd {
        Command::Start => handle_start(bot, msg, state).await,
        Command::Milestone => handle_milestone(bot, msg, state).await,
        Command::Test => handle_test(bot, msg, state).await,
        Command::Stats => handle_stats(bot, msg, state).await,
        Command::Help => handle_help(bot, msg, state).await,
    }
}

/// Handle the /start command.
pub async fn handle_start(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let welcome = format!(
        "Welcome to your Jar of Awesome! 🌟\n\n\
        I deliver your own recorded milestones back to you, so you don't \
        forget how much you've already done.\n\n\
        <b>Daily deliveries:</b> {}\n\n\
        <b>Commands:</b>\n\
        /milestone - get one right now\n\
        /test - preview deliveries across the day\n\
        /stats - see what's in the jar\n\
        /help - show help\n\n\
        You've been awesome the whole time - sometimes it just slips \
        your mind 💫",
        state.schedule_display()
    );

    bot.send_message(msg.chat.id, welcome)
        .parse_mode(ParseMode::Html)
        .reply_markup(reply_keyboard())
        .await?;

    info!(chat_id = %msg.chat.id, "user started bot");
    Ok(())
}

/// Handle the /milestone command - deliver one immediately.
pub async fn handle_milestone(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    match state.pipeline.deliver_to(msg.chat.id.0).await {
        Ok(report) => {
            info!(category = %report.category, "manual milestone sent");
        }
        Err(e) => {
            warn!(error = %e, "manual milestone failed");
            bot.send_message(msg.chat.id, "❌ Something went wrong. Try again in a bit.")
                .await?;
        }
    }
    Ok(())
}

/// Handle the /test command - preview deliveries.
///
/// In generative mode, shows how the same milestone reads at the four
/// canonical times; otherwise shows three random samples.
pub async fn handle_test(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if state.generative {
        let milestone = match state.pipeline.milestones().pick() {
            Ok(m) => m.clone(),
            Err(_) => {
                bot.send_message(msg.chat.id, "The jar is empty - add some milestones first!")
                    .await?;
                return Ok(());
            }
        };

        bot.send_message(
            msg.chat.id,
            format!(
                "🧪 The same milestone across the day:\n\n<b>Original:</b> {}",
                milestone.text
            ),
        )
        .parse_mode(ParseMode::Html)
        .await?;

        for slot in TimeSlot::ALL {
            let text = state
                .pipeline
                .render_at(&milestone, slot.canonical_hour(), 0)
                .await;
            bot.send_message(
                msg.chat.id,
                format!("<b>{} ({:02}:00)</b>\n{}", slot.label(), slot.canonical_hour(), text),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
    } else {
        bot.send_message(msg.chat.id, "🧪 Three random deliveries:")
            .await?;

        for i in 1..=3 {
            match state.pipeline.render_sample().await {
                Ok((milestone, text)) => {
                    bot.send_message(
                        msg.chat.id,
                        format!("<b>Sample {i}: {}</b>\n{text}", milestone.category),
                    )
                    .parse_mode(ParseMode::Html)
                    .await?;
                }
                Err(_) => {
                    bot.send_message(msg.chat.id, "The jar is empty - add some milestones first!")
                        .await?;
                    break;
                }
            }
        }
    }

    info!(chat_id = %msg.chat.id, "test preview sent");
    Ok(())
}

/// Handle the /stats command - show jar statistics.
pub async fn handle_stats(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let set = state.pipeline.milestones();
    let mut stats = set.category_stats();
    stats.sort_by(|a, b| b.1.cmp(&a.1));

    let mut text = format!(
        "📊 <b>Jar of Awesome stats</b>\n\n\
        Total: {} milestones\n\
        Categories: {}\n\n\
        <b>Per category:</b>\n",
        set.len(),
        set.categories().len()
    );
    for (category, count) in stats.iter().take(10) {
        text.push_str(&format!("• {category}: {count}\n"));
    }

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    info!(chat_id = %msg.chat.id, "stats sent");
    Ok(())
}

/// Handle the /help command.
pub async fn handle_help(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let text = format!(
        "{}\n\nScheduled deliveries: {}",
        Command::descriptions(),
        state.schedule_display()
    );
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Handle plain text messages - route keyboard button presses.
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    if !authorized(&msg, &state) {
        return Ok(());
    }

    match msg.text() {
        Some(MILESTONE_BUTTON) => handle_milestone(bot, msg, state).await,
        Some(TEST_BUTTON) => handle_test(bot, msg, state).await,
        Some(HELP_BUTTON) => handle_help(bot, msg, state).await,
        _ => Ok(()),
    }
}
