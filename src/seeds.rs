//! Built-in exercises (one per kind) that keep the service usable without an
//! external exercise bank.

use serde_json::json;

use crate::domain::{Exercise, ExerciseKind};

/// Small Kazakh-course starter set. Ids 1..=8, one exercise per kind.
pub fn seed_exercises() -> Vec<Exercise> {
  vec![
    Exercise {
      id: 1,
      title: "Жемістер".into(),
      kind: ExerciseKind::Flashcard,
      payload: json!({ "cards": [
        { "word": "алма", "definition": "apple", "exampleSentence": "Мен алма жеймін." },
        { "word": "алмұрт", "definition": "pear", "exampleSentence": "Алмұрт тәтті." }
      ]}),
    },
    Exercise {
      id: 2,
      title: "Кітапхана".into(),
      kind: ExerciseKind::Cloze,
      payload: json!({ "sentences": [
        { "text": "Мен кітапханада ___ оқимын.", "answers": ["кітап"] },
        { "text": "Кітапхана сағат ___ ашылады.", "answers": ["тоғызда", "9-да"] }
      ]}),
    },
    Exercise {
      id: 3,
      title: "Сөз тәртібі".into(),
      kind: ExerciseKind::SentenceReorder,
      payload: json!({ "fragments": ["Мен", "ертең", "мектепке", "барамын"] }),
    },
    Exercise {
      id: 4,
      title: "Түстер".into(),
      kind: ExerciseKind::MultipleChoice,
      payload: json!({ "questions": [
        { "question": "«Қызыл» қай түс?", "options": [
          { "answer": "red", "isCorrect": true },
          { "answer": "blue", "isCorrect": false },
          { "answer": "green", "isCorrect": false }
        ]},
        { "question": "«Ақ» қай түс?", "options": [
          { "answer": "black", "isCorrect": false },
          { "answer": "white", "isCorrect": true }
        ]}
      ]}),
    },
    Exercise {
      id: 5,
      title: "Ауа райы".into(),
      kind: ExerciseKind::Dictation,
      payload: json!({ "transcript": "Бүгін ауа райы өте жақсы", "audioUrl": "/media/dictation/weather.mp3" }),
    },
    Exercise {
      id: 6,
      title: "Дүкенде".into(),
      kind: ExerciseKind::ListeningQuiz,
      payload: json!({ "questions": [
        { "audioUrl": "/media/listening/shop.mp3", "question": "Сатып алушы не сұрады?", "options": [
          { "answer": "нан", "correct": true },
          { "answer": "сүт", "correct": false }
        ]}
      ]}),
    },
    Exercise {
      id: 7,
      title: "Базар".into(),
      kind: ExerciseKind::PictureDescription,
      payload: json!({
        "prompt": "Суретте не көріп тұрсыз?",
        "imageUrl": "/media/pictures/bazaar.jpg",
        "expectedKeywords": ["базар", "алма", "сатушы"]
      }),
    },
    Exercise {
      id: 8,
      title: "Сәлемдесу".into(),
      kind: ExerciseKind::Pronunciation,
      payload: json!({ "text": "Сәлеметсіз бе, менің атым Айгүл.", "audioUrl": "/media/pronunciation/greeting.mp3" }),
    },
  ]
}
