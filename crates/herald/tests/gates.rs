mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use herald::framework::{AntiSpamConfig, SpamScope};
use herald::prelude::*;
use tokio::time::advance;

use common::{RecordingClient, message};

fn invoke(client: &RecordingClient, user: &str, trigger: &str) -> Arc<Invocation> {
    let msg = message(user, Channel::direct("chan"), &format!("!{trigger}"));
    Arc::new(Invocation::new(
        Arc::new(client.clone()),
        msg,
        "!",
        trigger,
        Vec::new(),
    ))
}

fn daily() -> Command {
    Command::new(["daily"])
        .unwrap()
        .cooldown(Duration::from_secs(5), true)
        .executor(|inv, _| async move {
            inv.reply("claimed").await?;
            Ok(())
        })
}

#[tokio::test(start_paused = true)]
async fn cooldown_lifecycle() {
    let handler = CommandHandler::new();
    let command = daily();
    let cooldowns = handler.cooldowns();

    cooldowns.add_cooldown("u", &command);
    let state = cooldowns.check_cooldown("u", &command);
    assert!(state.active);
    assert!(state.remaining >= Duration::from_millis(1000));
    assert!(state.remaining <= Duration::from_millis(5000));

    advance(Duration::from_millis(4999)).await;
    let state = cooldowns.check_cooldown("u", &command);
    assert!(state.active);
    assert_eq!(state.remaining, Duration::from_millis(1000));

    advance(Duration::from_millis(2)).await;
    assert!(!cooldowns.check_cooldown("u", &command).active);
    assert!(cooldowns.is_empty());
    assert!(!cooldowns.check_cooldown("u", &command).active);
}

#[tokio::test(start_paused = true)]
async fn one_default_notice_per_invocation() {
    let client = RecordingClient::new();
    let handler = CommandHandler::new();
    handler
        .add_category(Category::new("Economy", "economy.rs").command(daily()))
        .unwrap();

    let first = handler.dispatch(invoke(&client, "u", "daily")).await.unwrap();
    assert_eq!(first, DispatchOutcome::Executed);

    advance(Duration::from_millis(1500)).await;
    let second = handler.dispatch(invoke(&client, "u", "daily")).await.unwrap();
    assert!(matches!(
        second,
        DispatchOutcome::CooldownActive {
            overridden: false,
            ..
        }
    ));

    let sent = client.sent_texts();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], "claimed");
    assert_eq!(sent[1], "Please wait 3.5s before using `daily` again.");

    // another user is not affected
    let other = handler.dispatch(invoke(&client, "v", "daily")).await.unwrap();
    assert_eq!(other, DispatchOutcome::Executed);
}

#[tokio::test(start_paused = true)]
async fn cooldown_hook_replaces_notice() {
    let client = RecordingClient::new();
    let hook_calls = Arc::new(AtomicUsize::new(0));
    let calls = Arc::clone(&hook_calls);
    let command = daily().set_override(HookId::Cooldown, move |ctx: HookContext| {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            if let HookArgs::Cooldown { remaining } = ctx.args {
                ctx.invocation
                    .reply(&format!("{}ms left", remaining.as_millis()))
                    .await?;
            }
            Ok(HookOutcome::Handled)
        }
    });
    let handler = CommandHandler::new();
    handler
        .add_category(Category::new("Economy", "economy.rs").command(command))
        .unwrap();

    handler.dispatch(invoke(&client, "u", "daily")).await.unwrap();
    advance(Duration::from_secs(2)).await;
    let outcome = handler.dispatch(invoke(&client, "u", "daily")).await.unwrap();

    assert!(matches!(
        outcome,
        DispatchOutcome::CooldownActive {
            overridden: true,
            ..
        }
    ));
    assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
    assert_eq!(client.sent_texts(), ["claimed", "3000ms left"]);
}

#[tokio::test(start_paused = true)]
async fn flooding_silences_cooldown_notices() {
    let client = RecordingClient::new();
    let handler = CommandHandler::builder()
        .anti_spam(AntiSpamConfig {
            window: Duration::from_secs(10),
            max_hits: 2,
            scope: SpamScope::User,
        })
        .build();
    handler
        .add_category(Category::new("Economy", "economy.rs").command(daily()))
        .unwrap();

    let mut outcomes = Vec::new();
    for _ in 0..4 {
        outcomes.push(handler.dispatch(invoke(&client, "u", "daily")).await.unwrap());
        advance(Duration::from_millis(100)).await;
    }

    assert_eq!(outcomes[0], DispatchOutcome::Executed);
    assert!(matches!(outcomes[1], DispatchOutcome::CooldownActive { .. }));
    assert_eq!(outcomes[2], DispatchOutcome::Suppressed);
    assert_eq!(outcomes[3], DispatchOutcome::Suppressed);
    assert_eq!(client.sent_texts().len(), 2);
}

#[tokio::test]
async fn user_permission_denied() {
    let client = RecordingClient::new();
    let handler = CommandHandler::new();
    handler
        .add_category(
            Category::new("Mod", "mod.rs").command(
                Command::new(["ban"])
                    .unwrap()
                    .user_permissions(vec![Permission::BanMembers])
                    .executor(|_, _| async { Ok(()) }),
            ),
        )
        .unwrap();

    let outcome = handler.dispatch(invoke(&client, "u", "ban")).await.unwrap();
    assert!(matches!(
        outcome,
        DispatchOutcome::PermissionDenied {
            overridden: false,
            ..
        }
    ));
    assert_eq!(client.sent_texts().len(), 1);
    assert!(client.sent_texts()[0].starts_with("You are missing"));
}
