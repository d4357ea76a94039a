use serde::Serialize;
use study_core::model::{Level, MistakeInput};

/// Prompt asking the model for a quiz of `level` over `context`.
#[must_use]
pub fn assessment_prompt(level: Level, context: &str) -> String {
    let count = level.question_count();
    match level {
        Level::Recall => format!(
            r#"You are an educational AI. Create a Level 1 Assessment (Recall & Understanding) based on the text below.

Rules:
1. Generate {count} Multiple Choice Questions (MCQs).
2. Focus strictly on DEFINITIONS, DIRECT FACTS, and basic UNDERSTANDING from the text.
3. Do not ask complex analysis questions yet.
4. Provide 4 options for each question.
5. Output JSON format only.

Text Context:
{context}

Output JSON format:
[
    {{
        "id": 1,
        "question": "What is...",
        "options": ["A", "B", "C", "D"],
        "correct_answer": "A",
        "explanation": "Brief explanation of why A is correct.",
        "hints": ["Hint 1 (Vague)", "Hint 2 (Helpful)", "Hint 3 (Giveaway)"]
    }}
]"#
        ),
        Level::Application => format!(
            r#"You are an educational AI. Create a Level 2 Assessment (Application & Analysis) based on the text below.

Rules:
1. Generate {count} Multiple Choice Questions (MCQs).
2. Focus on SCENARIOS, CASE STUDIES, and APPLICATION of concepts.
3. Questions should start like "A student observes that..." or "If X happens...", asking the user to apply knowledge.
4. Provide 4 options for each question.
5. Output JSON format only.

Text Context:
{context}

Output JSON format:
[
    {{
        "id": 1,
        "question": "Scenario...",
        "options": ["A", "B", "C", "D"],
        "correct_answer": "B",
        "explanation": "Brief explanation of why B is correct in this scenario.",
        "hints": ["Hint 1", "Hint 2", "Hint 3"]
    }}
]"#
        ),
        Level::Synthesis => format!(
            r#"You are an educational AI. Create a Level 3 Assessment (Creation & Evaluation) based on the text below.

Rules:
1. Generate {count} Short Answer / Thought-Provoking Questions.
2. Focus on "Create a solution", "Critique this method", "Propose an alternative".
3. These are Open-Ended questions requiring synthesis of newer case studies or concepts.
4. Output JSON format only.

Text Context:
{context}

Output JSON format:
[
    {{
        "id": 1,
        "question": "Propose a method to...",
        "type": "short_answer",
        "explanation": "Key elements that should be in the student's answer.",
        "hints": ["Think about...", "Consider...", "Remember the concept of..."]
    }}
]"#
        ),
    }
}

#[derive(Serialize)]
struct MissedQuestion<'a> {
    question: &'a str,
    user_answer: Option<&'a str>,
    correct_answer: Option<&'a str>,
}

/// Prompt asking the model to diagnose `mistakes` and propose a fix.
#[must_use]
pub fn remedial_prompt(mistakes: &[MistakeInput]) -> String {
    let missed: Vec<MissedQuestion<'_>> = mistakes
        .iter()
        .map(|m| MissedQuestion {
            question: &m.question,
            user_answer: m.user_answer.as_deref(),
            correct_answer: m.correct_answer.as_deref(),
        })
        .collect();
    let mistakes_text = serde_json::to_string_pretty(&missed).unwrap_or_default();

    format!(
        r#"You are an expert tutor. A student failed an assessment. Analyze their mistakes and provide a remedial plan.

Mistakes:
{mistakes_text}

Task:
1. **Diagnosis**: Classify the primary gap (Concept Gap, Application Gap, or Overgeneralization).
2. **Explanation**: Provide a clear, guided explanation to correct the misunderstanding (keep it under 100 words).
3. **Practice Question**: Create 1 single-choice practice question to verify understanding.

Output JSON ONLY:
{{
    "diagnosis": "Concept Gap: Misunderstood the definition of X",
    "explanation": "Here is why...",
    "practice_question": {{
        "question": "...",
        "options": ["A", "B", "C", "D"],
        "correct_answer": "A",
        "explanation": "..."
    }}
}}"#
    )
}
