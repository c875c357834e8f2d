//! # Rendering Module
//!
//! Plain-text rendering of command results. Every renderer takes an explicit `color` flag
//! so tests can check layout without ANSI codes; the `print_*` wrappers pass whatever
//! `console` detects for stdout.

use super::styles;
use armoryapp::commands::{AttachmentEntry, CmdMessage};
use armoryapp::model::{ActiveEffect, ActorRef, ItemRef};
use armoryapp::provenance::TagConfig;
use console::Style;

fn paint(style: Style, text: &str, color: bool) -> String {
    if color {
        style.force_styling(true).apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

pub fn render_messages(messages: &[CmdMessage], color: bool) -> String {
    messages
        .iter()
        .map(|m| format!("{}\n", paint(styles::message(&m.level), &m.content, color)))
        .collect()
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", render_messages(messages, console::colors_enabled()));
}

/// Renders a carrier's attachment listing, one numbered line per entry.
pub fn render_context(carrier: &ItemRef, entries: &[AttachmentEntry], color: bool) -> String {
    if entries.is_empty() {
        return format!("Nothing attached to {}.\n", carrier);
    }

    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let index = paint(styles::index(), &format!("{}.", i + 1), color);
        let name = if entry.resolved {
            paint(styles::name(), &entry.display_name, color)
        } else {
            paint(styles::missing(), &entry.display_name, color)
        };
        let reference = paint(styles::reference(), &format!("({})", entry.reference), color);
        out.push_str(&format!("{:>4} {} {}\n", index, name, reference));
    }
    out
}

pub fn print_context(carrier: &ItemRef, entries: &[AttachmentEntry]) {
    print!("{}", render_context(carrier, entries, console::colors_enabled()));
}

/// Renders an actor's effects. Effects created by armory show the link they came from.
pub fn render_effects(
    actor: &ActorRef,
    effects: &[ActiveEffect],
    tags: &TagConfig,
    color: bool,
) -> String {
    if effects.is_empty() {
        return format!("{} has no effects.\n", actor);
    }

    let mut out = String::new();
    for effect in effects {
        let name = paint(styles::name(), &effect.name, color);
        match tags.tag_of(effect) {
            Some(tag) => {
                let source = format!("from {} via {}", tag.item_ref, tag.carrier_ref);
                out.push_str(&format!(
                    "  {} {}\n",
                    name,
                    paint(styles::reference(), &source, color)
                ));
            }
            None => out.push_str(&format!("  {}\n", name)),
        }
    }
    out
}

pub fn print_effects(actor: &ActorRef, effects: &[ActiveEffect], tags: &TagConfig) {
    print!(
        "{}",
        render_effects(actor, effects, tags, console::colors_enabled())
    );
}
