//! Interactive console for driving a [`ListSequence`] by hand.
//!
//! Pure consumer of the public sequence API: it parses stdin, invokes the
//! operations, and reports any out-of-range message without aborting the
//! loop. Logging is routed through `tracing-subscriber`; set `RUST_LOG` to
//! see the crate's control-block events.

use std::{
    fmt::Display,
    io::{self, BufRead, Write},
    str::FromStr,
};

use custody::{ListSequence, Sequence};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        println!("Choose element type:");
        println!("  1. integer");
        println!("  2. text");
        println!("  3. floating-point");
        println!("  4. character");
        println!("  0. exit");
        let Some(choice) = prompt(&mut input, "> ") else {
            return;
        };
        match choice.as_str() {
            "1" => run_session::<i64>(&mut input),
            "2" => run_session::<String>(&mut input),
            "3" => run_session::<f64>(&mut input),
            "4" => run_session::<char>(&mut input),
            "0" => return,
            other => println!("unrecognized choice: {other}"),
        }
    }
}

fn run_session<T>(input: &mut impl BufRead)
where
    T: Clone + Display + FromStr + 'static,
    T::Err: Display,
{
    let mut sequence = ListSequence::<T>::new();
    loop {
        println!("Choose operation:");
        println!("  1. append an item");
        println!("  2. prepend an item");
        println!("  3. extract a subsequence");
        println!("  4. insert an item at an index");
        println!("  5. first item");
        println!("  6. last item");
        println!("  7. item at an index");
        println!("  8. length");
        println!("  9. print the sequence");
        println!("  0. back to the type menu");
        let Some(choice) = prompt(input, "> ") else {
            return;
        };
        match choice.as_str() {
            "1" => {
                if let Some(item) = read_item::<T>(input) {
                    sequence.append(item);
                    println!("appended");
                }
            }
            "2" => {
                if let Some(item) = read_item::<T>(input) {
                    sequence.prepend(item);
                    println!("prepended");
                }
            }
            "3" => {
                let Some(start) = read_index(input, "start index: ") else {
                    continue;
                };
                let Some(end) = read_index(input, "end index: ") else {
                    continue;
                };
                match sequence.subsequence(start, end) {
                    Ok(sub) => print_items("subsequence", &*sub),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            "4" => {
                let Some(index) = read_index(input, "index: ") else {
                    continue;
                };
                let Some(item) = read_item::<T>(input) else {
                    continue;
                };
                match sequence.insert_at(item, index) {
                    Ok(()) => println!("inserted"),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            "5" => match sequence.first() {
                Ok(item) => println!("first item: {item}"),
                Err(err) => eprintln!("error: {err}"),
            },
            "6" => match sequence.last() {
                Ok(item) => println!("last item: {item}"),
                Err(err) => eprintln!("error: {err}"),
            },
            "7" => {
                let Some(index) = read_index(input, "index: ") else {
                    continue;
                };
                match sequence.get(index) {
                    Ok(item) => println!("item at {index}: {item}"),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            "8" => println!("length: {}", sequence.len()),
            "9" => print_items("sequence", &sequence),
            "0" => return,
            other => println!("unrecognized choice: {other}"),
        }
    }
}

fn print_items<T>(label: &str, sequence: &dyn Sequence<T>)
where
    T: Clone + Display,
{
    print!("{label}:");
    for index in 0..sequence.len() {
        if let Ok(item) = sequence.get(index) {
            print!(" {item}");
        }
    }
    println!();
}

fn prompt(input: &mut impl BufRead, message: &str) -> Option<String> {
    print!("{message}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(err) => {
            eprintln!("input error: {err}");
            None
        }
    }
}

fn read_item<T>(input: &mut impl BufRead) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let line = prompt(input, "value: ")?;
    match line.parse::<T>() {
        Ok(item) => Some(item),
        Err(err) => {
            eprintln!("invalid value: {err}");
            None
        }
    }
}

// Indices are read as signed so a negative entry is reported as the
// out-of-range condition it is, instead of a bare parse failure.
fn read_index(input: &mut impl BufRead, message: &str) -> Option<usize> {
    let line = prompt(input, message)?;
    match line.parse::<i64>() {
        Ok(value) if value >= 0 => Some(value as usize),
        Ok(value) => {
            eprintln!("error: index {value} out of range");
            None
        }
        Err(err) => {
            eprintln!("invalid index: {err}");
            None
        }
    }
}
