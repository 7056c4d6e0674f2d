use std::io::{self, Write};

use chrono::{DateTime, Duration, Local, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::board::Board;
use crate::models::{Millis, NewTask};
use crate::storage::KeyValueStore;
use crate::urgency::time_left;

/// Formats a span as `2h 05m`, `12m` or `<1m`.
pub fn human_duration(ms: Millis) -> String {
    let d = Duration::milliseconds(ms.max(0));
    let hours = d.num_hours();
    let minutes = d.num_minutes() - hours * 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        "<1m".to_string()
    }
}

/// Local wall-clock time of a timestamp, `HH:MM`.
pub fn local_time(ms: Millis) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|d| d.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Posts a new task and returns its id.
pub fn cmd_post<S: KeyValueStore>(board: &mut Board<S>, new: NewTask, silent: bool) -> Option<String> {
    match board.create_task(new) {
        Ok(id) => {
            if !silent { println!("Task posted (id = {})", id); }
            Some(id)
        }
        Err(e) => {
            if !silent { eprintln!("Could not post task: {}", e); }
            None
        }
    }
}

/// Lists visible tasks, urgent first and then newest first.
pub fn cmd_list<S: KeyValueStore>(board: &Board<S>, neighborhood: Option<String>, search: Option<String>) {
    let query = search.unwrap_or_default();
    let tasks = board.visible_tasks(neighborhood.as_deref(), &query);
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let now = board.now();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Neighborhood").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Payment").add_attribute(Attribute::Bold),
            Cell::new("Where").add_attribute(Attribute::Bold),
            Cell::new("Posted").add_attribute(Attribute::Bold),
            Cell::new("Expires In").add_attribute(Attribute::Bold),
            Cell::new("").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let urgent = board.shows_urgent(t);
        let left = time_left(t, now);
        let where_str = match (t.location.is_empty(), t.safe_point.is_empty()) {
            (false, false) => format!("{} • {}", t.location, t.safe_point),
            (false, true) => t.location.clone(),
            (true, false) => t.safe_point.clone(),
            (true, true) => String::new(),
        };
        let mut title = format!("{} {}", t.category.icon(), t.title);
        if !t.description.is_empty() {
            title.push('\n');
            title.push_str(&t.description);
        }

        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(title),
            Cell::new(&t.neighborhood),
            Cell::new(format!("{}m", t.time_needed_minutes)),
            Cell::new(&t.payment),
            Cell::new(where_str),
            Cell::new(local_time(t.posted_at)),
            Cell::new(human_duration(left)).fg(if left < 60 * 60 * 1000 { Color::Yellow } else { Color::Reset }),
            if urgent {
                Cell::new("🚨 URGENT").fg(Color::Red).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            },
        ]);
    }

    println!("{table}");
}

/// Posts a fresh copy of a task.
pub fn cmd_repost<S: KeyValueStore>(board: &mut Board<S>, id: &str, silent: bool) {
    match board.repost(id) {
        Some(new_id) => { if !silent { println!("Task {} reposted as {}.", id, new_id); } }
        None => { if !silent { eprintln!("Task {} not found.", id); } }
    }
}

/// Credits a helper for a task, optionally removing it from the board.
pub fn cmd_helped<S: KeyValueStore>(board: &mut Board<S>, id: &str, nickname: Option<String>, remove: bool, silent: bool) {
    let nickname = nickname.unwrap_or_default();
    match board.mark_helped(id, &nickname, remove) {
        Ok(count) => {
            if !silent {
                println!("Thanks for helping! Helps so far: {}.", count);
                if remove { println!("Task {} removed from the board.", id); }
            }
        }
        Err(e) => { if !silent { eprintln!("{}", e); } }
    }
}

/// Removes a task from the board.
pub fn cmd_delete<S: KeyValueStore>(board: &mut Board<S>, id: &str, silent: bool) {
    if board.delete_task(id) {
        if !silent { println!("Task {} removed.", id); }
    } else {
        if !silent { eprintln!("Task {} not found.", id); }
    }
}

/// Prints the top helpers.
pub fn cmd_leaderboard<S: KeyValueStore>(board: &Board<S>, limit: Option<usize>) {
    let entries = match limit {
        Some(n) => crate::leaderboard::top_helpers(board.helpers(), n),
        None => board.top_helpers(),
    };
    if entries.is_empty() {
        println!("No helpers yet.");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL)
        .set_header(vec!["#", "Helper", "Helped"]);
    for (i, (name, count)) in entries.into_iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(name),
            Cell::new(count).fg(Color::Green),
        ]);
    }
    println!("{table}");
}

/// Adds a skill to the skills list.
pub fn cmd_skill_add<S: KeyValueStore>(board: &mut Board<S>, nickname: &str, skill: &str, silent: bool) {
    match board.add_skill(nickname, skill) {
        Ok(()) => { if !silent { println!("Skill added for {}.", nickname.trim()); } }
        Err(e) => { if !silent { eprintln!("Could not add skill: {}", e); } }
    }
}

/// Lists skills, newest first.
pub fn cmd_skill_list<S: KeyValueStore>(board: &Board<S>) {
    let skills = board.skills();
    if skills.is_empty() {
        println!("No skills listed yet.");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Neighbor", "Can help with"]);
    for s in skills {
        table.add_row(vec![s.nickname.clone(), s.skill_text.clone()]);
    }
    println!("{table}");
}

/// Posts an anonymous thank-you.
pub fn cmd_thank<S: KeyValueStore>(board: &mut Board<S>, text: &str, silent: bool) {
    match board.add_thank(text) {
        Ok(()) => { if !silent { println!("Thank-you posted."); } }
        Err(e) => { if !silent { eprintln!("Could not post thank-you: {}", e); } }
    }
}

/// Lists thank-you notes, newest first.
pub fn cmd_thanks_list<S: KeyValueStore>(board: &Board<S>) {
    let thanks = board.thanks();
    if thanks.is_empty() {
        println!("No thank-yous yet.");
        return;
    }
    for t in thanks {
        println!("💬 {}", t.text);
    }
}

/// Purges expired tasks now instead of waiting for the timer.
pub fn cmd_sweep<S: KeyValueStore>(board: &mut Board<S>, silent: bool) {
    let removed = board.sweep_expired();
    if !silent { println!("Removed {} expired task(s).", removed); }
}

/// Deletes all tasks, helpers, skills and thank-yous.
pub fn cmd_reset<S: KeyValueStore>(board: &mut Board<S>, force: bool) {
    if !force {
        print!("Are you sure you want to delete everything on the board? This cannot be undone. [y/N] ");
        let mut input = String::new();
        if io::stdout().flush().is_err() || io::stdin().read_line(&mut input).is_err() {
            eprintln!("Aborted.");
            return;
        }
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = board.reset() {
        eprintln!("Failed to reset board: {}", e);
    } else {
        println!("Board reset successfully.");
    }
}
