//! Bundled horror knowledge: category snippets, prompts, canned replies,
//! the per-title stats table and the genre shelves.
//!
//! Everything here is static data. Lookups are plain functions so callers
//! never touch the tables directly.

use serde::Serialize;

use crate::classifier::Category;
use crate::feedback::HorrorStats;

// =============================================================================
// Category knowledge
// =============================================================================

/// A movie the oracle can cite for a category
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KnowledgeEntry {
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

const fn entry(title: &'static str, year: &'static str, note: &'static str) -> KnowledgeEntry {
    KnowledgeEntry {
        title,
        year: Some(year),
        note: Some(note),
    }
}

const fn dated(title: &'static str, year: &'static str) -> KnowledgeEntry {
    KnowledgeEntry {
        title,
        year: Some(year),
        note: None,
    }
}

const fn kill(title: &'static str, note: &'static str) -> KnowledgeEntry {
    KnowledgeEntry {
        title,
        year: None,
        note: Some(note),
    }
}

const fn titled(title: &'static str) -> KnowledgeEntry {
    KnowledgeEntry {
        title,
        year: None,
        note: None,
    }
}

const BLOODIEST: &[KnowledgeEntry] = &[
    entry("Dead Alive", "1992", "300 liters of fake blood per minute in the final scene"),
    entry("Evil Dead", "2013", "70,000 gallons of fake blood used"),
    entry("The Shining", "1980", "The elevator blood scene alone used 300 gallons"),
    entry("Terrifier 2", "2022", "People passed out in theaters from the gore"),
    entry("Tokyo Gore Police", "2008", "Japanese splatter at its finest"),
];

const WEIRD_KILLS: &[KnowledgeEntry] = &[
    kill("Final Destination 2", "Death by flying fence"),
    kill("Leprechaun", "Pogo stick murder"),
    kill("Jack Frost", "Carrot nose stabbing"),
    kill("The Happening", "Death by lawnmower"),
    kill("Thankskilling", "Turkey with a shotgun"),
];

const NUDITY: &[KnowledgeEntry] = &[
    dated("Zombie Strippers", "2008"),
    dated("Piranha 3D", "2010"),
    dated("Species", "1995"),
    dated("Lifeforce", "1985"),
    dated("Return of the Living Dead", "1985"),
];

const ZOMBIES: &[KnowledgeEntry] = &[
    entry("Dawn of the Dead", "1978", "Both the 1978 original and the 2004 remake"),
    titled("28 Days Later"),
    titled("Train to Busan"),
    titled("Shaun of the Dead"),
    titled("Night of the Living Dead"),
    titled("World War Z"),
    titled("Zombieland"),
    titled("The Return of the Living Dead"),
    titled("Day of the Dead"),
];

const VAMPIRES: &[KnowledgeEntry] = &[
    titled("Let the Right One In"),
    titled("Interview with the Vampire"),
    titled("30 Days of Night"),
    titled("Near Dark"),
    titled("The Lost Boys"),
    titled("Blade"),
    titled("From Dusk Till Dawn"),
    titled("What We Do in the Shadows"),
    titled("Nosferatu"),
    titled("Bram Stoker's Dracula"),
];

const SLASHERS: &[KnowledgeEntry] = &[
    titled("Halloween"),
    titled("Friday the 13th"),
    titled("A Nightmare on Elm Street"),
    titled("Scream"),
    titled("Child's Play"),
    titled("Texas Chainsaw Massacre"),
    titled("Candyman"),
    titled("I Know What You Did Last Summer"),
];

/// Movies to cite for a category, for the six knowledge-backed categories
pub fn knowledge_for(category: Category) -> Option<&'static [KnowledgeEntry]> {
    match category {
        Category::Bloodiest => Some(BLOODIEST),
        Category::WeirdKills => Some(WEIRD_KILLS),
        Category::Nudity => Some(NUDITY),
        Category::Zombies => Some(ZOMBIES),
        Category::Vampires => Some(VAMPIRES),
        Category::Slashers => Some(SLASHERS),
        _ => None,
    }
}

/// The movie shown alongside a category answer, if the category has one
pub fn sample_movie(category: Category) -> Option<&'static str> {
    match category {
        Category::Bloodiest | Category::Zombies | Category::Vampires | Category::Slashers => {
            knowledge_for(category).and_then(|entries| entries.first()).map(|e| e.title)
        }
        _ => None,
    }
}

// =============================================================================
// Prompts
// =============================================================================

/// System prompts for the four "tell me more" stages
pub const TELL_ME_MORE_PROMPTS: [&str; 4] = [
    "You are the Horror Oracle continuing a discussion about a horror movie. \
The user wants to know more. Focus on behind-the-scenes trivia, production stories, or interesting facts about the cast. \
Start naturally - maybe with \"Here's something wild...\" or \"Fun fact:\" or \"You know what's crazy?\" or \"The production story is insane...\" \
Keep it conversational and engaging. DON'T start with \"Oh man\" or similar phrases.",
    "You are the Horror Oracle going deeper into horror movie discussion. \
Now discuss the film's influence on the genre, other movies it inspired, or its cultural impact. \
Start with varied phrases like \"This movie actually changed everything...\" or \"What most people don't realize is...\" \
or \"The legacy of this film...\" or \"After this came out...\" Be natural and varied.",
    "You are the Horror Oracle in deep discussion about a horror movie. \
Talk about controversial aspects, censorship issues, or different versions/cuts of the film. \
Start uniquely - \"There's actually a darker version...\" or \"The censors went crazy over...\" \
or \"In some countries...\" or \"The unrated cut shows...\" Mix it up, be unpredictable.",
    "You are the Horror Oracle sharing the deepest lore about a horror movie. \
Discuss fan theories, hidden meanings, or connections to other films. \
Begin differently each time - \"Fans have this theory that...\" or \"If you look closely...\" \
or \"The director confirmed that...\" or \"There's this Easter egg...\" Keep it fresh and exciting.",
];

/// Stage prompt for a "tell me more" follow-up; stages outside 1..=4 use stage 1
pub fn tell_me_more_prompt(stage: u8, movie_title: &str, query: &str) -> String {
    let index = usize::from(stage.clamp(1, 4)) - 1;
    format!(
        "{}\n\nMovie being discussed: {}\nUser query: {}",
        TELL_ME_MORE_PROMPTS[index], movie_title, query
    )
}

pub const PERSONA_PROMPT: &str = "You are the Horror Oracle, a passionate horror movie expert who talks like a knowledgeable friend at a horror convention.

IMPORTANT PERSONALITY TRAITS:
- Speak conversationally, like you're chatting with a fellow horror fan
- Get genuinely excited about discussing horror movies
- Use phrases like \"Dude, you HAVE to see...\", \"That movie is insane!\", \"I love that one!\"
- Share your personal reactions: \"That scene made me jump out of my seat!\", \"I couldn't sleep after watching that\"
- Be enthusiastic but not overly formal

CONVERSATION STYLE:
- Start responses with casual acknowledgment: \"Oh, you want the bloody stuff!\", \"Zombie movies? I got you covered!\", \"Weird kills? Buckle up!\"
- Use first person: \"I remember when I first saw...\", \"My favorite part is when...\"
- Include reactions: \"That movie is BRUTAL\", \"It's so messed up but in the best way\"

When answering questions about categories (bloodiest, weirdest, most nudity, etc):
- Don't just list movies, TALK about them
- Share WHY they fit the category
- Include fun facts or personal reactions

Keep responses to 2-3 short paragraphs max, but make them engaging and conversational.";

/// Quiz request for the model; the reply must be a bare JSON array
pub fn quiz_prompt(movie: &str) -> String {
    format!(
        "Write 10 multiple-choice trivia questions about the horror movie '{movie}'.\n\
Format as JSON:\n\
[\n  {{ \"question\": \"Question text\", \"options\": [\"A\",\"B\",\"C\",\"D\"], \"answer\": \"A\" }},\n  ...\n]"
    )
}

// =============================================================================
// Canned replies
// =============================================================================

const TELL_ME_MORE_FALLBACKS: [&str; 5] = [
    "Here's something wild about {title} - the practical effects were all done without CGI! They used gallons of corn syrup and food coloring for the blood.",
    "Fun fact: {title} was actually banned in several countries! The censors thought it was too intense for audiences.",
    "You know what's crazy? The lead actor in {title} did all their own stunts. No doubles, just pure dedication to the horror.",
    "The production story is insane - they filmed {title} in an actual abandoned location that locals claimed was haunted!",
    "What most people don't realize is that {title} inspired a whole wave of copycats. It basically created its own subgenre.",
];

/// Offline "tell me more" text for a stage, cycling through five templates
pub fn tell_me_more_fallback(stage: u8, movie_title: &str) -> String {
    let index = usize::from(stage.max(1) - 1) % TELL_ME_MORE_FALLBACKS.len();
    TELL_ME_MORE_FALLBACKS[index].replace("{title}", movie_title)
}

/// Offline answer for a category, `None` where only the generic line fits
pub fn canned_response(category: Category) -> Option<&'static str> {
    let text = match category {
        Category::Bloodiest => "You want the bloody stuff! Dead Alive (1992) is INSANE - they used 300 liters of fake blood per minute in the final scene! Evil Dead 2013 is also completely drenched in blood. And if you want something recent, Terrifier 2 made people literally pass out in theaters from the gore!",
        Category::WeirdKills => "Weird kills? Buckle up! Final Destination 2 has the flying fence, Leprechaun has a pogo stick murder, and Jack Frost kills someone with a carrot nose. Horror writers are unhinged in the best way.",
        Category::Nudity => "Horror has never been shy! Lifeforce (1985) and Species (1995) are the classics everyone mentions, Return of the Living Dead has the famous graveyard scene, and Piranha 3D goes completely over the top.",
        Category::Zombies => "Zombie movies? I got you covered! Train to Busan is absolutely incredible - fast zombies and it'll make you cry. 28 Days Later changed the game with running zombies. And Dawn of the Dead (both versions) are must-watches. Shaun of the Dead if you want laughs with your zombies!",
        Category::Vampires => "Vampires done right? Let the Right One In is haunting and beautiful, Near Dark is a grimy road-trip nightmare, and What We Do in the Shadows will have you crying laughing. Nosferatu still creeps me out a century later.",
        Category::Slashers => "Slashers are my comfort food! Halloween (1978) is the blueprint, Scream reinvented the whole thing, and A Nightmare on Elm Street gave us Freddy. Start there and work your way into the deep cuts.",
        Category::Recommendation => "Tell me a movie you loved and I'll find its evil twin! If you want a safe bet, Hereditary, The Descent and The Thing never miss.",
        Category::Scariest => "The scariest? The Exorcist still wrecks people fifty years later. Hereditary left me staring at the ceiling all night, and Sinister has that found-footage box that'll ruin your sleep.",
        Category::TellMeMore | Category::SpecificMovie | Category::General => return None,
    };
    Some(text)
}

pub const GENERIC_FALLBACK: &str =
    "I love talking horror! What specifically are you in the mood for? Slashers, zombies, vampires, or something really messed up?";

pub const DISTURBED_SPIRITS: &str =
    "The spirits are disturbed, but I'd love to talk horror with you! What kind of scares are you looking for?";

/// Apology used when the model fails mid "tell me more" thread
pub fn tell_me_more_apology(movie_title: &str) -> String {
    format!(
        "Here's a fascinating detail about {movie_title} - it's considered one of the most influential horror films of its era!"
    )
}

// =============================================================================
// Horror stats
// =============================================================================

const fn stats(gore: u32, fear: f64, kills: u32) -> HorrorStats {
    HorrorStats { gore, fear, kills }
}

/// Curated stats, keyed by lowercase title
const HORROR_STATS: &[(&str, HorrorStats)] = &[
    ("saw", stats(85, 7.5, 6)),
    ("the conjuring", stats(20, 9.0, 2)),
    ("halloween", stats(65, 8.0, 17)),
    ("scream", stats(70, 7.0, 7)),
    ("friday the 13th", stats(75, 7.5, 22)),
    ("nightmare on elm street", stats(60, 8.5, 4)),
    ("the exorcist", stats(30, 9.5, 2)),
    ("it", stats(55, 8.0, 8)),
    ("hereditary", stats(65, 9.0, 5)),
    ("midsommar", stats(70, 8.0, 9)),
    ("the babadook", stats(15, 8.5, 1)),
    ("get out", stats(25, 7.5, 6)),
    ("a quiet place", stats(30, 8.5, 3)),
    ("sinister", stats(45, 9.0, 5)),
    ("insidious", stats(20, 8.5, 2)),
    ("paranormal activity", stats(10, 7.0, 1)),
    ("the descent", stats(70, 8.5, 6)),
    ("texas chainsaw massacre", stats(90, 8.0, 5)),
    ("evil dead", stats(95, 7.5, 5)),
    ("terrifier", stats(100, 8.0, 9)),
    ("hellraiser", stats(85, 8.5, 4)),
];

/// Curated stats for a normalized (lowercase, trimmed) title
pub fn curated_stats(normalized_title: &str) -> Option<HorrorStats> {
    HORROR_STATS
        .iter()
        .find(|(title, _)| *title == normalized_title)
        .map(|(_, stats)| *stats)
}

// =============================================================================
// Genre shelves
// =============================================================================

/// A browsable genre with its fixed pick list
#[derive(Debug, Clone, Copy)]
pub struct GenreShelf {
    pub slug: &'static str,
    pub heading: &'static str,
    pub tagline: &'static str,
    pub movies: &'static [&'static str],
}

impl GenreShelf {
    /// Announcement for a pick from this shelf
    pub fn announce(&self, movie: &str) -> String {
        format!("{}: {}! {}", self.heading, movie, self.tagline)
    }
}

pub const GENRE_SHELVES: &[GenreShelf] = &[
    GenreShelf {
        slug: "slashers",
        heading: "SLASHER PICK",
        tagline: "Classic masked killer mayhem with plenty of creative kills.",
        movies: &[
            "Halloween", "Friday the 13th", "A Nightmare on Elm Street", "Scream",
            "Child's Play", "Texas Chainsaw Massacre", "Candyman", "I Know What You Did Last Summer",
            "Black Christmas", "My Bloody Valentine", "Sleepaway Camp", "The Burning",
        ],
    },
    GenreShelf {
        slug: "zombies",
        heading: "ZOMBIE PICK",
        tagline: "Brain-munching undead action at its finest.",
        movies: &[
            "Dawn of the Dead", "28 Days Later", "Train to Busan", "Shaun of the Dead",
            "Night of the Living Dead", "World War Z", "Zombieland", "Return of the Living Dead",
            "Day of the Dead", "28 Weeks Later", "Dead Snow", "Rec",
        ],
    },
    GenreShelf {
        slug: "vampires",
        heading: "VAMPIRE PICK",
        tagline: "Bloodsucking terror from the children of the night.",
        movies: &[
            "Let the Right One In", "Interview with the Vampire", "30 Days of Night",
            "Near Dark", "The Lost Boys", "Blade", "From Dusk Till Dawn",
            "What We Do in the Shadows", "Nosferatu", "Bram Stoker's Dracula", "Fright Night",
        ],
    },
    GenreShelf {
        slug: "gore-fests",
        heading: "GORE FEST",
        tagline: "Prepare for gallons of blood and extreme violence.",
        movies: &[
            "Evil Dead", "Dead Alive", "Terrifier", "Saw", "Hostel", "The Green Inferno",
            "Tokyo Gore Police", "Machine Girl", "Braindead", "Bad Taste", "Dead Snow",
        ],
    },
    GenreShelf {
        slug: "supernatural",
        heading: "SUPERNATURAL",
        tagline: "Ghostly encounters and paranormal terror.",
        movies: &[
            "The Conjuring", "Insidious", "Sinister", "The Babadook", "Hereditary",
            "The Exorcist", "Poltergeist", "The Ring", "The Grudge", "Paranormal Activity",
        ],
    },
    GenreShelf {
        slug: "demons",
        heading: "DEMONIC",
        tagline: "Hell's minions bring pure evil to Earth.",
        movies: &[
            "The Exorcist", "Hellraiser", "Evil Dead", "The Conjuring", "Insidious",
            "Sinister", "Drag Me to Hell", "The Possession", "Demons", "Night of the Demons",
        ],
    },
    GenreShelf {
        slug: "psycho-killers",
        heading: "PSYCHO KILLER",
        tagline: "Human monsters are the scariest of all.",
        movies: &[
            "Psycho", "The Silence of the Lambs", "American Psycho", "Henry: Portrait of a Serial Killer",
            "Maniac", "The Strangers", "You're Next", "The Purge", "Funny Games",
        ],
    },
    GenreShelf {
        slug: "alien-horror",
        heading: "ALIEN HORROR",
        tagline: "Terror from beyond the stars.",
        movies: &[
            "Alien", "The Thing", "Invasion of the Body Snatchers", "They Live",
            "Event Horizon", "Life", "The Faculty", "Attack the Block", "Color Out of Space",
        ],
    },
    GenreShelf {
        slug: "creature-features",
        heading: "CREATURE FEATURE",
        tagline: "Monsters, beasts, and things that go bump.",
        movies: &[
            "The Descent", "Tremors", "Jeepers Creepers", "Dog Soldiers", "The Ritual",
            "Crawl", "Alligator", "Jaws", "The Host", "Cloverfield", "A Quiet Place",
        ],
    },
    GenreShelf {
        slug: "haunted-houses",
        heading: "HAUNTED HOUSE",
        tagline: "Spooky dwellings with dark secrets.",
        movies: &[
            "The Haunting", "House on Haunted Hill", "The Amityville Horror", "Poltergeist",
            "The Changeling", "Hell House LLC", "Sinister", "Insidious", "The Conjuring",
        ],
    },
    GenreShelf {
        slug: "psychological",
        heading: "PSYCHOLOGICAL",
        tagline: "Mind-bending terror that gets under your skin.",
        movies: &[
            "The Babadook", "Black Swan", "Shutter Island", "The Others", "Rosemary's Baby",
            "Don't Look Now", "The Machinist", "Jacob's Ladder", "Mulholland Drive",
        ],
    },
    GenreShelf {
        slug: "cult-horror",
        heading: "CULT HORROR",
        tagline: "Religious fanatics and occult nightmares.",
        movies: &[
            "The Wicker Man", "Rosemary's Baby", "Midsommar", "The Witch", "Apostle",
            "Kill List", "Red State", "Martha Marcy May Marlene", "The Invitation",
        ],
    },
];

/// Shelf for a genre slug, case-insensitive
pub fn genre_shelf(slug: &str) -> Option<&'static GenreShelf> {
    let slug = slug.trim().to_lowercase();
    GENRE_SHELVES.iter().find(|shelf| shelf.slug == slug)
}
