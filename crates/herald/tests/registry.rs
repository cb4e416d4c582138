use std::sync::atomic::{AtomicUsize, Ordering};

use herald::prelude::*;

fn noop(triggers: &[&str]) -> Command {
    Command::new(triggers.iter().copied())
        .unwrap()
        .executor(|_, _| async { Ok(()) })
}

fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}

#[test]
fn every_trigger_maps_to_one_command() {
    let handler = CommandHandler::new();
    handler
        .add_category(Category::new("Util", "util.rs").command(noop(&["ping", "p"])))
        .unwrap();

    let err = handler
        .add_category(
            Category::new("Games", "games.rs")
                .command(noop(&["roll"]))
                .command(noop(&["pong", "P"])),
        )
        .unwrap_err();
    match err {
        HandlerError::DuplicateCommand {
            trigger,
            incoming,
            existing,
        } => {
            assert_eq!(trigger, "p");
            assert_eq!(incoming.as_str(), "games.rs");
            assert_eq!(existing.as_str(), "util.rs");
        }
        other => panic!("unexpected error: {other}"),
    }

    // the failed add left nothing behind
    assert_eq!(handler.category_names(), ["Util"]);
    assert!(handler.resolve("roll").is_none());
}

#[test]
fn duplicate_help_across_categories() {
    let handler = CommandHandler::new();
    handler
        .add_category(Category::new("A", "a.rs").command(noop(&["help"])))
        .unwrap();
    let result = handler.add_category(Category::new("B", "b.rs").command(noop(&["help"])));

    assert!(matches!(result, Err(HandlerError::DuplicateCommand { .. })));
    assert!(handler.get_category("B").unwrap().is_none());
    let (_, owner) = handler.get_command("help").unwrap().unwrap();
    assert_eq!(owner.name(), "A");
}

#[test]
fn add_then_remove_restores_views() {
    let handler = CommandHandler::new();
    handler
        .add_category(Category::new("Util", "util.rs").command(noop(&["ping"])))
        .unwrap();

    let commands_before = handler.commands().len();
    let triggers_before = sorted(handler.triggers());
    let names_before = handler.category_names();

    handler
        .add_category(
            Category::new("Fun", "fun.rs")
                .command(noop(&["joke", "j"]))
                .command(noop(&["meme"])),
        )
        .unwrap();
    assert_eq!(handler.commands().len(), commands_before + 2);
    assert_eq!(handler.triggers().len(), triggers_before.len() + 3);

    assert!(handler.remove_category("Fun").unwrap());
    assert_eq!(handler.commands().len(), commands_before);
    assert_eq!(sorted(handler.triggers()), triggers_before);
    assert_eq!(handler.category_names(), names_before);
    assert!(!handler.remove_category("Fun").unwrap());
}

#[test]
fn empty_names_are_invalid() {
    let handler = CommandHandler::new();
    assert!(matches!(
        handler.get_category(""),
        Err(HandlerError::InvalidArgument(_))
    ));
    assert!(matches!(
        handler.get_command(""),
        Err(HandlerError::InvalidArgument(_))
    ));
    assert!(matches!(
        handler.remove_category(""),
        Err(HandlerError::InvalidArgument(_))
    ));
}

#[test]
fn reload_picks_up_new_factory_output() {
    let builds = std::sync::Arc::new(AtomicUsize::new(0));
    let counter = std::sync::Arc::clone(&builds);
    let loader = ModuleLoader::new().with("commands/fun.rs", move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let mut category = Category::new("Fun", "commands/fun.rs").command(noop(&["ping"]));
        if n > 0 {
            category = category.command(noop(&["joke"]));
        }
        Ok(category)
    });
    let handler = CommandHandler::builder().loader(loader).build();

    handler.load_category("commands/fun.rs").unwrap();
    assert!(handler.resolve("joke").is_none());

    handler.reload_category("Fun").unwrap();
    assert_eq!(handler.category_names(), ["Fun"]);
    assert!(handler.resolve("ping").is_some());
    assert!(handler.resolve("joke").is_some());
    assert_eq!(builds.load(Ordering::SeqCst), 2);
}

#[test]
fn reload_unknown_category() {
    let handler = CommandHandler::new();
    assert!(matches!(
        handler.reload_category("Ghost"),
        Err(HandlerError::CategoryNotFound(name)) if name == "Ghost"
    ));
}
