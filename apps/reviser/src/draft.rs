//! Local draft generator.
//!
//! Produces a template cover letter from the user's request so the result
//! screen always has a document to show, even when the critique service sends
//! back an empty rewrite. The draft is the lowest-priority text candidate.

use rand::Rng;

/// Known focus areas, checked in order. Each entry lists the spellings that
/// select it (English and Korean job postings are both common).
const FOCUS_AREAS: &[(&[&str], &str)] = &[
    (&["web development", "웹 개발"], "web development"),
    (&["backend", "back-end", "백엔드"], "backend development"),
    (&["frontend", "front-end", "프론트엔드"], "frontend development"),
    (&["full-stack", "fullstack", "풀스택"], "full-stack development"),
    (&["data analysis", "데이터 분석"], "data analysis"),
    (&["ai/ml", "machine learning"], "AI/ML"),
];

/// Broader areas used when no specific focus matches. Matched case-sensitively
/// so that "AI" does not fire inside ordinary words.
const GENERIC_AREAS: &[(&[&str], &str)] = &[
    (&["develop", "Develop", "개발"], "software development"),
    (&["data", "Data", "데이터"], "data processing"),
    (&["AI", "인공지능"], "AI technology"),
];

const DEFAULT_FOCUS: &str = "IT technology";

const TEMPLATES: &[&str] = &[
    "I am an enthusiastic applicant who wants to grow in IT through {focus}.

Throughout university I built technical skills and learned to collaborate through a range of projects and team activities. I have a particular interest in {focus} and have been studying the related stack while gaining hands-on experience.

Most recently I implemented {focus} features in a team project, which taught me how much problem solving and code quality matter. Beyond shipping features, I learned to design with the user in mind and to write code that stays maintainable.

If I join your company, I will keep learning and growing so that I can contribute to the team. I pick up new technology quickly and want to apply that ability to help your services improve.

Thank you.",
    "Hello. I am applying because I want to grow into a developer with real expertise in {focus}.

I find great satisfaction in analysing and solving problems. I have applied what I learned in my degree to real projects and deepened my understanding of {focus}. Personal projects in particular took me from planning to deployment and taught me ownership and attention to finish.

I also keep up with current trends through online communities and study groups, actively picking up new tools and methods related to {focus} so that I am ready to apply them in practice.

I would like to join your team and turn the skills and passion I have built into meaningful value. I will be a developer who never stops learning.

Thank you.",
];

/// Picks the focus area a draft should emphasise.
pub fn extract_focus(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    first_match(FOCUS_AREAS, &lowered)
        .or_else(|| first_match(GENERIC_AREAS, text))
        .unwrap_or(DEFAULT_FOCUS)
}

fn first_match(areas: &[(&[&str], &'static str)], haystack: &str) -> Option<&'static str> {
    areas
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| haystack.contains(n)))
        .map(|(_, label)| *label)
}

/// Generates a draft cover letter from a free-text request.
pub fn generate_draft<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let template = TEMPLATES[rng.gen_range(0..TEMPLATES.len())];
    template.replace("{focus}", extract_focus(text))
}
