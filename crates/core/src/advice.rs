const DISCLAIMER: &str = "**Disclaimer:** This is general information only. Always consult healthcare professionals for proper diagnosis and treatment.";

const GENERAL_ADVICE: [(&str, &str, &[&str]); 4] = [
    (
        "headache",
        "For headaches, you can try:",
        &[
            "Rest in a quiet, dark room",
            "Apply a cold or warm compress",
            "Stay hydrated",
            "Consider over-the-counter pain relievers like acetaminophen or ibuprofen",
            "If severe or persistent, consult a doctor",
        ],
    ),
    (
        "fever",
        "For fever management:",
        &[
            "Stay hydrated with plenty of fluids",
            "Rest and avoid strenuous activities",
            "Use fever reducers like acetaminophen or ibuprofen",
            "Dress lightly and keep the room cool",
            "Seek medical attention if fever exceeds 103°F (39.4°C)",
        ],
    ),
    (
        "cold",
        "For the common cold:",
        &[
            "Get plenty of rest",
            "Drink warm liquids",
            "Use saline nasal drops",
            "Consider throat lozenges",
            "Humidify the air",
            "Most colds resolve in 7-10 days",
        ],
    ),
    (
        "cough",
        "For cough relief:",
        &[
            "Stay hydrated",
            "Use honey (for adults)",
            "Try a warm salt water gargle",
            "Use a humidifier",
            "Avoid irritants like smoke",
            "See a doctor if the cough persists over 2 weeks",
        ],
    ),
];

/// Self-care guidance for a handful of everyday complaints named in the query.
pub fn general_advice(query: &str) -> Option<String> {
    let lowered = query.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    let (condition, intro, tips) = GENERAL_ADVICE.iter().find(|(condition, _, _)| {
        words
            .iter()
            .any(|word| *word == *condition || word.strip_suffix('s') == Some(*condition))
    })?;

    let mut response = format!("## General Advice for {}\n\n{intro}\n", title_case(condition));
    for tip in tips.iter() {
        response.push_str(&format!("• {tip}\n"));
    }
    response.push('\n');
    response.push_str(DISCLAIMER);
    Some(response)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
