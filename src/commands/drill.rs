//! Interactive practice and quiz loops on the terminal.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

use anyhow::Result;

use dictbuddy_core::{
    AnswerResult, AttemptLog, Config, DictError, PracticeEngine, PracticeState, QuizEngine,
    QuizState, WordStore,
};

use super::open_store;

const NO_WORDS: &str = "ไม่มีคำศัพท์สำหรับฝึก กรุณาเพิ่มคำศัพท์ก่อนเริ่มฝึก";

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn ask(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_summary(log: &AttemptLog) {
    let stats = log.stats();
    if stats.total_attempts == 0 {
        return;
    }
    println!(
        "\nAnswered {} ({} correct, {} wrong), accuracy {:.1}%",
        stats.total_attempts, stats.correct_count, stats.incorrect_count, stats.accuracy_percent
    );
    let missed = log.missed_words();
    if !missed.is_empty() {
        println!("Missed most:");
        for (english, count) in missed.iter().take(5) {
            println!("  {english} ({count})");
        }
    }
}

pub fn practice(config: &Config, reverse: bool) -> Result<()> {
    let store = open_store(config)?;
    let mut engine = PracticeEngine::from_config(store.list(None)?, config);
    if reverse {
        engine.toggle_direction();
    }
    if engine.state() == PracticeState::Finished {
        println!("{NO_WORDS}");
        return Ok(());
    }

    println!("Type the translation. :t switches direction, :s skips, :q quits.");
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        match engine.state() {
            PracticeState::Finished => {
                println!("\nจบรอบแล้ว!");
                break;
            }
            PracticeState::AwaitingAnswer => {
                println!(
                    "\n[{}] เหลือ: {} คำ",
                    engine.direction().label(),
                    engine.remaining_count()
                );
                let prompt = format!("{}\n> ", engine.prompt().unwrap_or_default());
                let Some(line) = ask(&mut input, &prompt)? else {
                    break;
                };
                match line.as_str() {
                    ":q" => break,
                    ":t" => engine.toggle_direction(),
                    ":s" => engine.skip()?,
                    answer => {
                        engine.submit_answer(answer, Instant::now())?;
                        if let Some(feedback) = engine.feedback() {
                            println!("{}", feedback.message());
                        }
                    }
                }
            }
            PracticeState::AutoAdvancing => {
                if let Some(wait) = engine.advance_remaining(Instant::now()) {
                    thread::sleep(wait);
                }
                engine.poll(Instant::now());
            }
            PracticeState::ShowingAnswer => {
                let Some(line) = ask(&mut input, "Enter for the next word (:q quits) ")? else {
                    break;
                };
                match line.as_str() {
                    ":q" => break,
                    ":t" => engine.toggle_direction(),
                    _ => engine.skip()?,
                }
            }
        }
    }

    print_summary(engine.log());
    Ok(())
}

pub fn quiz(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let mut engine = QuizEngine::from_config(store.list(None)?, config);

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        match engine.state() {
            QuizState::Empty => {
                println!("{NO_WORDS}");
                return Ok(());
            }
            QuizState::Completed => {
                println!(
                    "\nคะแนน: {}/{}",
                    engine.score(),
                    engine.answered_count()
                );
                print_summary(engine.log());
                let again = ask(&mut input, "เริ่มใหม่? [y/N] ")?;
                if matches!(again.as_deref(), Some("y" | "Y")) {
                    engine.restart()?;
                } else {
                    return Ok(());
                }
            }
            QuizState::Question => {
                let Some(question) = engine.question() else {
                    continue;
                };
                println!(
                    "\nคะแนน: {}/{}  เหลือ: {} คำ",
                    engine.score(),
                    engine.answered_count(),
                    engine.remaining_count()
                );
                println!("{}", question.prompt());
                let ids: Vec<usize> = question.choices.iter().map(|c| c.id).collect();
                for (n, choice) in question.choices.iter().enumerate() {
                    println!("  {}. {}", n + 1, choice.text);
                }

                let Some(line) = ask(&mut input, "> ")? else {
                    return Ok(());
                };
                if line == ":q" {
                    print_summary(engine.log());
                    return Ok(());
                }
                let Some(&choice_id) = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| ids.get(i))
                else {
                    println!("Enter a number from 1 to {}", ids.len());
                    continue;
                };

                match engine.answer(choice_id, Instant::now()) {
                    Ok(AnswerResult::Ignored) => {}
                    Ok(_) => {
                        if let Some(feedback) = engine.feedback() {
                            println!("{}", feedback.message());
                        }
                    }
                    Err(DictError::InvalidChoice(_)) => {
                        println!("Enter a number from 1 to {}", ids.len());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            QuizState::ShowingFeedback => {
                if let Some(wait) = engine.advance_remaining(Instant::now()) {
                    thread::sleep(wait);
                }
                engine.poll(Instant::now());
            }
        }
    }
}
