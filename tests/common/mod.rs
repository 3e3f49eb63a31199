#![allow(dead_code)]

use quiz_deck::quiz::Question;

pub fn question(text: &str, answers: &[&str]) -> Question {
    Question::new(text, answers.iter().map(|a| a.to_string()).collect())
}

pub fn capital_of_france() -> Vec<Question> {
    vec![question(
        "Capital of France?",
        &["Paris", "London", "Berlin", "Madrid"],
    )]
}

pub fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            let answers: Vec<String> = (0..2 + i % 4)
                .map(|a| {
                    if a == 0 {
                        format!("Correct {}", i + 1)
                    } else {
                        format!("Wrong {}.{}", i + 1, a)
                    }
                })
                .collect();
            Question::new(format!("Question {}", i + 1), answers)
        })
        .collect()
}
