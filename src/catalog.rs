//! Static services catalog shown on the services page and in the terminal.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Service {
    pub id: u32,
    pub title: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub items: &'static [&'static str],
    pub features: &'static [&'static str],
    pub technologies: &'static [&'static str],
    pub available: bool,
}

static SERVICES: &[Service] = &[
    Service {
        id: 1,
        title: "Web Development",
        slug: "web-development",
        description: "Fast, accessible websites and web apps built from scratch or on top of an existing stack.",
        items: &["Landing pages", "Marketing sites", "Single-page applications"],
        features: &["Responsive layouts", "SEO basics", "Performance budgets"],
        technologies: &["TypeScript", "React", "Rust", "WebAssembly"],
        available: true,
    },
    Service {
        id: 2,
        title: "UI/UX Design",
        slug: "ui-ux-design",
        description: "Interface design from wireframes to a polished, themeable design system.",
        items: &["Wireframes", "High-fidelity mockups", "Design systems"],
        features: &["Dark and light themes", "Accessible color palettes", "Motion guidelines"],
        technologies: &["Figma", "CSS", "Tailwind"],
        available: true,
    },
    Service {
        id: 3,
        title: "Performance Audits",
        slug: "performance-audits",
        description: "Profiling and tuning of existing sites for load time and runtime smoothness.",
        items: &["Core Web Vitals review", "Bundle analysis", "Rendering profiling"],
        features: &["Written report", "Prioritised fixes", "Before/after metrics"],
        technologies: &["Lighthouse", "Chrome DevTools", "WebPageTest"],
        available: true,
    },
    Service {
        id: 4,
        title: "Technical Consulting",
        slug: "technical-consulting",
        description: "Architecture reviews and hands-on guidance for small teams.",
        items: &["Architecture review", "Code review", "Mentoring"],
        features: &["Remote sessions", "Async feedback"],
        technologies: &["Rust", "TypeScript", "Cloud hosting"],
        available: false,
    },
];

pub fn all() -> &'static [Service] {
    SERVICES
}

pub fn find_by_slug(slug: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|s| s.slug == slug)
}

pub fn available() -> impl Iterator<Item = &'static Service> {
    SERVICES.iter().filter(|s| s.available)
}
