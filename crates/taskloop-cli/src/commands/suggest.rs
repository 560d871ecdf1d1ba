//! Task suggestion command for CLI.

use taskloop_core::{Config, Database, Frequency, NewTask, Suggester, Tracker};

pub fn run(add: bool, seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let username = config.profile.username.clone();
    let tracker = Tracker::with_config(Database::open()?, config.tracker());

    let mut suggester = match seed {
        Some(seed) => Suggester::with_seed(seed),
        None => Suggester::new(),
    };
    let existing: Vec<String> = tracker
        .list_tasks(&username)?
        .into_iter()
        .map(|t| t.name)
        .collect();
    let suggestion = suggester.pick_new(&existing);
    println!("Suggestion: {suggestion}");

    if add {
        let task = tracker.add_task(
            &username,
            NewTask {
                name: suggestion.to_string(),
                description: None,
                frequency: Frequency::Daily,
                reminder_time: None,
            },
        )?;
        println!("Task created: {}", task.id);
    }
    Ok(())
}
