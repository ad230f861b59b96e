// All LLM prompt constants for cover-letter generation.
// The letter is written in French; the template is fixed and not parameterized.

/// System message sent ahead of every letter prompt.
pub const LETTER_SYSTEM: &str =
    "Vous êtes un expert en rédaction de lettres de motivation professionnelles.";

/// Letter generation prompt template.
/// Replace: {cv_content}, {job_offer}, {structure}
pub const LETTER_PROMPT_TEMPLATE: &str = r#"En utilisant les informations suivantes :

CV :
{cv_content}

Offre d'emploi :
{job_offer}

Structure des lettres de motivation précédentes :
{structure}

Générez une lettre de motivation professionnelle en français qui :
1. Suit une structure similaire aux lettres précédentes
2. Utilise spécifiquement les informations pertinentes du CV, en mentionnant les éléments factuels et éventuellement techniques qui pourraient correspondre aux exigences ou à l'environnement mentionné dans l'offre d'emploi
3. Fait référence aux exigences de l'offre d'emploi
4. Est personnalisée et convaincante
"#;
