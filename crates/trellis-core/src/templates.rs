//! Bundled template gallery.
//!
//! The catalog is static data compiled into the binary; there is no fetch.
//! Filtering is a category match intersected with a case-insensitive
//! substring search over name and description.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Gallery category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Components,
    Business,
    Landing,
    Portfolio,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Components,
        Category::Business,
        Category::Landing,
        Category::Portfolio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Components => "components",
            Category::Business => "business",
            Category::Landing => "landing",
            Category::Portfolio => "portfolio",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selection in the gallery; `All` applies no filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a gallery button's `data-category` value.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "all" {
            return Some(CategoryFilter::All);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .map(CategoryFilter::Only)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => only == category,
        }
    }
}

/// A read-only catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub markup: &'static str,
    pub styling: &'static str,
    pub scripting: &'static str,
}

impl Template {
    /// Owned copy of the template's buffers.
    pub fn document(&self) -> Document {
        Document::new(self.markup, self.styling, self.scripting)
    }

    fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Scaled-down document for the gallery card thumbnail.
    pub fn thumbnail(&self) -> String {
        format!(
            "<div style=\"transform: scale(0.4); transform-origin: top left; width: 250%; height: 250%; overflow: hidden;\"><style>{}</style>{}</div>",
            self.styling, self.markup
        )
    }
}

/// Templates matching both the category filter and the search text.
pub fn filter(category: CategoryFilter, search: &str) -> Vec<&'static Template> {
    let needle = search.to_lowercase();
    CATALOG
        .iter()
        .filter(|t| category.matches(t.category) && t.matches_search(&needle))
        .collect()
}

pub fn find(key: &str) -> Option<&'static Template> {
    CATALOG.iter().find(|t| t.key == key)
}

pub static CATALOG: &[Template] = &[
    Template {
        key: "basic",
        name: "Basic HTML",
        description: "A minimal HTML5 boilerplate for starting any web page.",
        category: Category::Components,
        markup: r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Basic HTML Page</title>
</head>
<body>
    <h1>Hello, World!</h1>
    <p>This is a basic HTML template. Start coding here!</p>
</body>
</html>"#,
        styling: r#"body {
    font-family: system-ui, sans-serif;
    line-height: 1.6;
    margin: 2rem;
    background-color: #f8f9fa;
}
h1 {
    color: #343a40;
}"#,
        scripting: r#"console.log('Page loaded successfully!');"#,
    },
    Template {
        key: "card",
        name: "Image Card",
        description: "A responsive card component with an image and text.",
        category: Category::Components,
        markup: r##"<div class="card">
    <div class="card-img"></div>
    <div class="card-content">
        <h2 class="card-title">Component Card</h2>
        <p class="card-body">Use cards to display products, articles, or any other content.</p>
        <a href="#" class="card-button">Learn More</a>
    </div>
</div>"##,
        styling: r#"body { display: flex; align-items: center; justify-content: center; min-height: 100vh; margin: 0; background: #e9ecef; }
.card { width: 320px; border-radius: 12px; overflow: hidden; background: white; font-family: sans-serif; box-shadow: 0 8px 16px rgba(0,0,0,0.1); transition: transform 0.3s ease; }
.card:hover { transform: translateY(-5px); }
.card-img { height: 180px; background: linear-gradient(135deg, #0d6efd, #6f42c1); }
.card-content { padding: 1.5rem; }
.card-title { margin: 0 0 0.5rem; color: #333; }
.card-body { margin: 0 0 1.5rem; color: #666; line-height: 1.5; }
.card-button { display: inline-block; background: #0d6efd; color: white; padding: 0.75rem 1.5rem; border-radius: 50px; text-decoration: none; font-weight: bold; }"#,
        scripting: r#"document.querySelector('.card-button').addEventListener('click', (e) => {
    e.preventDefault();
    alert('Button clicked! This card is interactive.');
});"#,
    },
    Template {
        key: "form",
        name: "Contact Form",
        description: "A beautifully styled and modern contact form.",
        category: Category::Components,
        markup: r#"<form class="contact-form">
    <h3>Contact Us</h3>
    <label for="name">Name</label>
    <input type="text" id="name" required placeholder="Your name">
    <label for="email">Email</label>
    <input type="email" id="email" required placeholder="you@example.com">
    <label for="message">Message</label>
    <textarea id="message" rows="4" required></textarea>
    <button type="submit">Send Message</button>
    <p class="status" hidden>Thanks! We'll be in touch.</p>
</form>"#,
        styling: r#"body { display: flex; align-items: center; justify-content: center; min-height: 100vh; margin: 0; background: #f4f4f4; font-family: 'Segoe UI', sans-serif; }
.contact-form { width: 100%; max-width: 420px; padding: 2rem; border-radius: 10px; background: white; box-shadow: 0 10px 25px rgba(0,0,0,0.1); display: grid; gap: 0.5rem; }
.contact-form h3 { text-align: center; margin: 0 0 1rem; }
input, textarea { padding: 0.6rem; border: 1px solid #ccc; border-radius: 6px; font: inherit; }
button { margin-top: 1rem; padding: 0.75rem; border: 0; border-radius: 6px; background: #198754; color: white; font-weight: bold; cursor: pointer; }
.status { color: #198754; text-align: center; }"#,
        scripting: r#"const form = document.querySelector('.contact-form');
form.addEventListener('submit', (e) => {
    e.preventDefault();
    form.querySelector('.status').hidden = false;
    form.reset();
});"#,
    },
    Template {
        key: "blogPost",
        name: "Blog Post",
        description: "A clean and readable layout for a blog article.",
        category: Category::Business,
        markup: r#"<article class="post">
    <header>
        <h1>Writing for the Web</h1>
        <p class="meta">Published on <time datetime="2024-03-01">March 1, 2024</time></p>
    </header>
    <p>Good web writing is short, scannable, and honest about what the reader will get.</p>
    <h2>Keep paragraphs short</h2>
    <p>Readers skim. Give them headings and small blocks of text they can jump between.</p>
    <blockquote>Clarity is a kindness to your reader.</blockquote>
</article>"#,
        styling: r#"body { margin: 0; background: #fdfdfd; color: #222; font-family: Georgia, serif; }
.post { max-width: 680px; margin: 3rem auto; padding: 0 1.5rem; line-height: 1.75; font-size: 1.1rem; }
.meta { color: #888; font-family: sans-serif; font-size: 0.9rem; }
blockquote { margin: 2rem 0; padding-left: 1rem; border-left: 4px solid #0d6efd; font-style: italic; color: #555; }"#,
        scripting: "",
    },
    Template {
        key: "productPage",
        name: "Product Page",
        description: "A simple and effective product detail page.",
        category: Category::Business,
        markup: r#"<main class="product">
    <div class="gallery"></div>
    <section>
        <h1>Aurora Desk Lamp</h1>
        <p class="price">$49.00</p>
        <p>Warm, dimmable light with a minimalist aluminium body.</p>
        <label>Quantity <input id="qty" type="number" min="1" value="1"></label>
        <button id="add">Add to cart</button>
        <p id="cart">Cart: 0 items</p>
    </section>
</main>"#,
        styling: r#"body { margin: 0; font-family: system-ui, sans-serif; background: #fafafa; }
.product { display: grid; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); gap: 2rem; max-width: 900px; margin: 3rem auto; padding: 0 1.5rem; }
.gallery { min-height: 320px; border-radius: 12px; background: radial-gradient(circle at 30% 30%, #ffe29f, #ffa99f); }
.price { font-size: 1.5rem; color: #d63384; font-weight: bold; }
button { padding: 0.75rem 1.5rem; border: 0; border-radius: 8px; background: #212529; color: white; cursor: pointer; }"#,
        scripting: r#"let count = 0;
document.getElementById('add').addEventListener('click', () => {
    count += Number(document.getElementById('qty').value) || 1;
    document.getElementById('cart').textContent = `Cart: ${count} items`;
});"#,
    },
    Template {
        key: "emailNewsletter",
        name: "Email Newsletter",
        description: "A responsive email template for newsletters, compatible with most email clients.",
        category: Category::Business,
        markup: r##"<table width="100%" border="0" cellspacing="0" cellpadding="0" style="background-color:#f1f1f1;">
    <tr>
        <td align="center" valign="top">
            <table width="600" border="0" cellspacing="0" cellpadding="20" style="max-width:600px; background-color:#ffffff; margin:20px 0;">
                <tr>
                    <td align="center" style="padding:20px 0; border-bottom:1px solid #dddddd;">
                        <h1 style="margin:0; font-family:Arial, sans-serif; font-size:28px; color:#333333;">Company Newsletter</h1>
                    </td>
                </tr>
                <tr>
                    <td style="padding:30px 20px;">
                        <h2 style="font-family:Arial, sans-serif; font-size:22px; color:#333333;">This Month's Top Story</h2>
                        <p style="font-family:Arial, sans-serif; font-size:16px; color:#555555; line-height:1.6;">Our monthly roundup of product news, release notes and stories from the team.</p>
                        <a href="#" style="display:inline-block; background-color:#0d6efd; color:#ffffff; padding:12px 25px; text-decoration:none; border-radius:5px; font-family:Arial, sans-serif;">Read More</a>
                    </td>
                </tr>
                <tr>
                    <td align="center" style="padding:20px; font-family:Arial, sans-serif; font-size:12px; color:#888888; border-top:1px solid #dddddd;">
                        <p style="margin:0;">&copy; Your Company. All rights reserved.</p>
                        <p style="margin:5px 0 0;"><a href="#" style="color:#888888;">Unsubscribe</a> | <a href="#" style="color:#888888;">View in browser</a></p>
                    </td>
                </tr>
            </table>
        </td>
    </tr>
</table>"##,
        styling: r#"/* Mail clients mostly ignore <style>; the markup carries inline styles. */
body { margin: 0; padding: 0; background-color: #f1f1f1; font-family: Arial, sans-serif; }"#,
        scripting: "/* Mail clients do not run scripts. */",
    },
    Template {
        key: "promoBanner",
        name: "Promotional Banner",
        description: "A responsive and eye-catching banner for promotions or announcements.",
        category: Category::Components,
        markup: r##"<div class="promo-banner">
    <div class="banner-text">
        <h2>Summer Sale!</h2>
        <p>Up to 50% off selected items this week only.</p>
        <a href="#" class="banner-cta">Shop Now</a>
    </div>
</div>"##,
        styling: r#"body { display: flex; align-items: center; justify-content: center; min-height: 100vh; margin: 0; background-color: #f0f2f5; }
.promo-banner { width: 100%; max-width: 800px; padding: 4rem 2rem; border-radius: 15px; background-image: linear-gradient(45deg, #ff9a9e 0%, #fad0c4 100%); color: white; text-align: center; box-shadow: 0 10px 20px rgba(0,0,0,0.1); font-family: 'Segoe UI', sans-serif; }
.banner-text h2 { font-size: 3rem; margin: 0 0 1rem; text-shadow: 1px 1px 3px rgba(0,0,0,0.2); }
.banner-text p { font-size: 1.2rem; margin: 0 0 2rem; opacity: 0.9; }
.banner-cta { display: inline-block; background-color: white; color: #ff9a9e; padding: 0.8rem 2rem; border-radius: 50px; text-decoration: none; font-weight: bold; transition: all 0.3s ease; }
.banner-cta:hover { transform: scale(1.05); box-shadow: 0 5px 15px rgba(0,0,0,0.2); }"#,
        scripting: r#"document.querySelector('.banner-cta').addEventListener('click', (e) => {
    e.preventDefault();
    alert('Redirecting to the shop!');
});"#,
    },
    Template {
        key: "newsCard",
        name: "Card News",
        description: "A vertical card format, perfect for social media style news snippets.",
        category: Category::Components,
        markup: r#"<div class="news-card">
    <div class="news-card-content">
        <h1>City Opens Its First Solar-Powered Library</h1>
        <p class="news-source">Local Desk / Morning Edition</p>
    </div>
</div>"#,
        styling: r#"body { display: flex; align-items: center; justify-content: center; min-height: 100vh; margin: 0; background-color: #1a1a1a; }
.news-card { width: 400px; aspect-ratio: 9 / 16; box-sizing: border-box; border-radius: 20px; background-image: linear-gradient(rgba(0,0,0,0.1), rgba(0,0,0,0.8)), linear-gradient(160deg, #f59e0b, #be123c 60%, #1e1b4b); color: white; font-family: 'Helvetica Neue', sans-serif; display: flex; flex-direction: column; justify-content: flex-end; padding: 2rem; box-shadow: 0 15px 30px rgba(0,0,0,0.4); }
.news-card-content h1 { font-size: 2.8rem; line-height: 1.2; margin: 0 0 1rem; font-weight: 900; }
.news-source { font-size: 1rem; opacity: 0.8; margin: 0; }"#,
        scripting: "// Display only.",
    },
    Template {
        key: "agencyHomepage",
        name: "Creative Agency",
        description: "A modern, professional landing page for a creative agency or portfolio.",
        category: Category::Landing,
        markup: r##"<header class="agency-header">
    <nav>
        <div class="logo">C R E A T I V E</div>
        <ul class="nav-links">
            <li><a href="#services">Services</a></li>
            <li><a href="#services" class="contact-button">Contact</a></li>
        </ul>
    </nav>
    <div class="hero">
        <h1>We Design Experiences.</h1>
        <p>Digital work that captivates and converts.</p>
    </div>
</header>
<main>
    <section id="services">
        <h2>What We Do</h2>
        <div class="services-grid">
            <div class="service-card"><h3>Branding</h3><p>Crafting unique identities.</p></div>
            <div class="service-card"><h3>Web Design</h3><p>Building beautiful websites.</p></div>
            <div class="service-card"><h3>Marketing</h3><p>Reaching the right audience.</p></div>
        </div>
    </section>
</main>"##,
        styling: r#"body { margin: 0; font-family: 'Inter', sans-serif; background-color: #0a0a0a; color: #f5f5f5; }
.agency-header { background: #111; padding: 1.5rem 5%; }
nav { display: flex; justify-content: space-between; align-items: center; }
.logo { font-weight: 700; letter-spacing: 2px; }
.nav-links { list-style: none; display: flex; gap: 2rem; align-items: center; margin: 0; }
.nav-links a { color: #f5f5f5; text-decoration: none; transition: color 0.3s; }
.nav-links a:hover { color: #007bff; }
.contact-button { background-color: #007bff; padding: 0.6rem 1.2rem; border-radius: 5px; }
.contact-button:hover { color: white !important; }
.hero { text-align: center; padding: 8rem 2rem; }
.hero h1 { font-size: 4rem; margin: 0; }
.hero p { font-size: 1.2rem; color: #aaa; }
#services { padding: 5rem 5%; text-align: center; }
.services-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 2rem; }
.service-card { background-color: #1a1a1a; padding: 2.5rem; border-radius: 10px; border: 1px solid #333; transition: all 0.3s; }
.service-card:hover { transform: translateY(-10px); border-color: #007bff; }"#,
        scripting: r##"document.querySelectorAll('a[href^="#"]').forEach((anchor) => {
    anchor.addEventListener('click', (e) => {
        e.preventDefault();
        document.querySelector(anchor.getAttribute('href'))?.scrollIntoView({ behavior: 'smooth' });
    });
});"##,
    },
    Template {
        key: "eventLanding",
        name: "Event Landing Page",
        description: "A striking landing page for a conference or event.",
        category: Category::Landing,
        markup: r#"<section class="event">
    <p class="tag">Oct 12 to 14 · Lisbon</p>
    <h1>WebConf 2025</h1>
    <p id="countdown">Loading countdown...</p>
    <button>Get tickets</button>
</section>"#,
        styling: r#"body { margin: 0; font-family: 'Trebuchet MS', sans-serif; }
.event { min-height: 100vh; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 1rem; color: white; background: linear-gradient(135deg, #ff0080, #7928ca); text-align: center; }
.event h1 { font-size: 4rem; margin: 0; }
.tag { letter-spacing: 0.2em; text-transform: uppercase; }
button { padding: 1rem 2.5rem; border: 2px solid white; border-radius: 999px; background: transparent; color: white; font-size: 1rem; cursor: pointer; }"#,
        scripting: r#"const target = new Date('2025-10-12T09:00:00Z');
function tick() {
    const ms = Math.max(0, target - new Date());
    const days = Math.floor(ms / 86400000);
    const hours = Math.floor(ms / 3600000) % 24;
    document.getElementById('countdown').textContent = `${days} days ${hours} hours to go`;
}
tick();
setInterval(tick, 60000);"#,
    },
    Template {
        key: "businessCard",
        name: "Business Card",
        description: "An elegant and professional digital business card.",
        category: Category::Business,
        markup: r#"<div class="bcard">
    <h2>Jordan Lee</h2>
    <p class="role">Product Designer</p>
    <ul>
        <li>jordan@example.com</li>
        <li>+1 555 0100</li>
    </ul>
    <button id="flip">Copy email</button>
</div>"#,
        styling: r#"body { display: grid; place-items: center; min-height: 100vh; margin: 0; background: #1f2937; font-family: 'Helvetica Neue', sans-serif; }
.bcard { width: 340px; padding: 2rem; border-radius: 14px; background: linear-gradient(145deg, #111827, #374151); color: #f9fafb; box-shadow: 0 20px 40px rgba(0,0,0,0.4); }
.role { color: #fbbf24; letter-spacing: 0.1em; text-transform: uppercase; font-size: 0.8rem; }
ul { list-style: none; padding: 0; line-height: 1.8; }
button { background: transparent; color: inherit; border: 1px solid #fbbf24; border-radius: 6px; padding: 0.4rem 0.9rem; cursor: pointer; }"#,
        scripting: r#"document.getElementById('flip').addEventListener('click', (e) => {
    navigator.clipboard?.writeText('jordan@example.com');
    e.target.textContent = 'Copied!';
});"#,
    },
    Template {
        key: "landing",
        name: "SaaS Landing Page",
        description: "A clean landing page for a Software-as-a-Service.",
        category: Category::Landing,
        markup: r##"<header class="hero">
    <nav><strong>Flowly</strong><a href="#pricing">Pricing</a></nav>
    <h1>Ship work, not status updates.</h1>
    <p>Flowly keeps your team in sync without the meetings.</p>
    <a class="cta" href="#pricing">Start free trial</a>
</header>
<section id="pricing" class="plans">
    <div class="plan"><h3>Starter</h3><p>$0</p></div>
    <div class="plan featured"><h3>Team</h3><p>$12</p></div>
    <div class="plan"><h3>Enterprise</h3><p>Talk to us</p></div>
</section>"##,
        styling: r#"body { margin: 0; font-family: Inter, system-ui, sans-serif; color: #0f172a; }
.hero { padding: 2rem 2rem 5rem; text-align: center; background: linear-gradient(180deg, #eef2ff, #ffffff); }
nav { display: flex; justify-content: space-between; max-width: 960px; margin: 0 auto 4rem; }
nav a { color: #4f46e5; text-decoration: none; }
.hero h1 { font-size: clamp(2rem, 5vw, 3.5rem); margin: 0 0 1rem; }
.cta { display: inline-block; margin-top: 1.5rem; padding: 0.9rem 2rem; border-radius: 999px; background: #4f46e5; color: white; text-decoration: none; }
.plans { display: flex; flex-wrap: wrap; gap: 1.5rem; justify-content: center; padding: 3rem 1rem; }
.plan { width: 200px; padding: 1.5rem; border: 1px solid #e2e8f0; border-radius: 12px; text-align: center; }
.featured { border-color: #4f46e5; box-shadow: 0 10px 30px rgba(79,70,229,0.2); }"#,
        scripting: r##"document.querySelectorAll('a[href^="#"]').forEach((a) => {
    a.addEventListener('click', (e) => {
        e.preventDefault();
        document.querySelector(a.getAttribute('href')).scrollIntoView({ behavior: 'smooth' });
    });
});"##,
    },
    Template {
        key: "portfolio",
        name: "Minimal Portfolio",
        description: "A modern, minimalist portfolio page for developers.",
        category: Category::Portfolio,
        markup: r##"<header>
    <h1>Sam Rivera</h1>
    <p>Frontend developer building fast, accessible interfaces.</p>
</header>
<main class="projects">
    <a class="project" href="#"><h3>Weatherly</h3><p>Forecast app with offline support.</p></a>
    <a class="project" href="#"><h3>Inkwell</h3><p>Markdown notes that sync everywhere.</p></a>
    <a class="project" href="#"><h3>Pixelate</h3><p>Tiny image editor in the browser.</p></a>
</main>"##,
        styling: r#"body { margin: 0; padding: 4rem 1.5rem; font-family: 'SF Mono', Menlo, monospace; background: #0b0b0c; color: #e5e5e5; }
header, .projects { max-width: 720px; margin: 0 auto; }
header p { color: #9ca3af; }
.projects { display: grid; gap: 1rem; margin-top: 3rem; }
.project { display: block; padding: 1.25rem; border: 1px solid #27272a; border-radius: 10px; color: inherit; text-decoration: none; transition: border-color 0.2s; }
.project:hover { border-color: #22d3ee; }
.project p { margin: 0; color: #a1a1aa; }"#,
        scripting: "",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keys_unique() {
        let mut keys: Vec<_> = CATALOG.iter().map(|t| t.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CATALOG.len());
    }

    #[test]
    fn test_every_category_has_a_template() {
        for category in Category::ALL {
            assert!(!filter(CategoryFilter::Only(category), "").is_empty(), "{category}");
        }
    }

    #[test]
    fn test_all_without_search_returns_catalog() {
        assert_eq!(filter(CategoryFilter::All, "").len(), CATALOG.len());
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let by_name = filter(CategoryFilter::All, "CONTACT");
        assert_eq!(by_name.iter().map(|t| t.key).collect::<Vec<_>>(), vec!["form"]);

        let by_description = filter(CategoryFilter::All, "conference");
        assert_eq!(
            by_description.iter().map(|t| t.key).collect::<Vec<_>>(),
            vec!["eventLanding"]
        );
    }

    #[test]
    fn test_search_keeps_surrounding_spaces() {
        let keys: Vec<_> = filter(CategoryFilter::All, "card ").iter().map(|t| t.key).collect();
        assert_eq!(keys, vec!["card", "newsCard"]);
        assert!(filter(CategoryFilter::All, "card").iter().any(|t| t.key == "businessCard"));
    }

    #[test]
    fn test_category_sizes() {
        let count = |c| filter(CategoryFilter::Only(c), "").len();
        assert_eq!(CATALOG.len(), 13);
        assert_eq!(count(Category::Components), 5);
        assert_eq!(count(Category::Business), 4);
        assert_eq!(count(Category::Landing), 3);
        assert_eq!(count(Category::Portfolio), 1);
    }

    #[test]
    fn test_filter_is_intersection() {
        assert!(filter(CategoryFilter::Only(Category::Portfolio), "contact").is_empty());
        let landing = filter(CategoryFilter::Only(Category::Landing), "page");
        assert!(landing.iter().all(|t| t.category == Category::Landing));
        assert_eq!(landing.len(), 3);
    }

    #[test]
    fn test_category_filter_names() {
        assert_eq!(CategoryFilter::from_name("all"), Some(CategoryFilter::All));
        assert_eq!(
            CategoryFilter::from_name("landing"),
            Some(CategoryFilter::Only(Category::Landing))
        );
        assert_eq!(CategoryFilter::from_name("misc"), None);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("blogPost").map(|t| t.name), Some("Blog Post"));
        assert_eq!(find("landing").map(|t| t.name), Some("SaaS Landing Page"));
        assert!(find("missing").is_none());
    }
}
