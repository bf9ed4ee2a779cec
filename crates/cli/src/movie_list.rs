//! Titles pre-warmed by `build-cache`.
//!
//! Grouped by subgenre. A few titles appear in more than one group; the
//! builder counts repeats as already cached.

pub const HORROR_MOVIES: &[&str] = &[
    // Classics
    "The Exorcist", "The Shining", "Psycho", "The Texas Chain Saw Massacre",
    "Halloween", "A Nightmare on Elm Street", "Friday the 13th", "Hellraiser",
    "Child's Play", "Candyman", "The Thing", "Alien", "The Omen", "Carrie",
    "Rosemary's Baby", "The Birds", "Jaws", "The Silence of the Lambs",
    // 2000s
    "The Ring", "The Grudge", "Saw", "Hostel", "28 Days Later", "Dawn of the Dead",
    "The Descent", "Paranormal Activity", "Cloverfield", "Let the Right One In",
    "The Orphanage", "[REC]", "The Mist", "1408", "Trick 'r Treat",
    // 2010s and later
    "The Conjuring", "Insidious", "Sinister", "It", "It Chapter Two",
    "Get Out", "Us", "Hereditary", "Midsommar", "The Witch", "The Babadook",
    "It Follows", "A Quiet Place", "A Quiet Place Part II", "The Invisible Man",
    "Ready or Not", "Malignant", "The Black Phone", "Smile", "Pearl", "X",
    "Barbarian", "Nope", "M3GAN", "Cocaine Bear", "Scream", "Scream VI",
    // Zombies
    "Night of the Living Dead", "Dawn of the Dead", "Day of the Dead",
    "Return of the Living Dead", "Zombieland", "Zombieland: Double Tap",
    "World War Z", "Train to Busan", "Shaun of the Dead", "28 Weeks Later",
    "The Girl with All the Gifts", "Cargo", "Dead Snow", "Fido",
    // Vampires
    "Dracula", "Nosferatu", "Interview with the Vampire", "Blade",
    "From Dusk Till Dawn", "30 Days of Night", "What We Do in the Shadows",
    "Only Lovers Left Alive", "Let Me In", "Byzantium", "The Lost Boys",
    "Near Dark", "Fright Night", "Bram Stoker's Dracula",
    // Slashers
    "Scream 2", "Scream 3", "Scream 4", "Scream 5",
    "I Know What You Did Last Summer", "Urban Legend", "Valentine",
    "Happy Death Day", "Happy Death Day 2U", "Freaky", "Fear Street Part One",
    "Fear Street Part Two", "Fear Street Part Three", "The Strangers",
    // Supernatural
    "The Conjuring 2", "The Conjuring 3", "Annabelle", "Annabelle Creation",
    "The Nun", "The Curse of La Llorona", "Lights Out", "Don't Breathe",
    "Don't Breathe 2", "Evil Dead", "Evil Dead Rise", "Ouija", "Oculus",
    "The Woman in Black", "Mama", "As Above So Below", "The Autopsy of Jane Doe",
    // Gore and extreme
    "Terrifier", "Terrifier 2", "The Green Inferno", "Martyrs", "High Tension",
    "Inside", "Frontier(s)", "The Hills Have Eyes", "Wrong Turn",
    "The Human Centipede", "Cannibal Holocaust", "Bone Tomahawk",
    // Creature features
    "The Host", "The Ritual", "Crawl", "47 Meters Down", "The Meg",
    "Underwater", "Life", "The Relic", "Deep Rising", "Tremors",
    "Gremlins", "Critters", "Attack the Block", "Slither",
    // Psychological
    "Black Swan", "Shutter Island", "The Machinist", "American Psycho",
    "The Sixth Sense", "The Others", "Don't Look Now", "Jacob's Ladder",
    "The Invitation", "Coherence", "The Killing of a Sacred Deer",
    // Found footage
    "The Blair Witch Project", "Paranormal Activity 2", "Paranormal Activity 3",
    "V/H/S", "V/H/S/2", "The Visit", "Unfriended", "Host", "Searching",
    "Missing", "Dashcam", "Deadstream", "Gonjiam: Haunted Asylum",
    // International
    "The Wailing", "I Saw the Devil", "A Tale of Two Sisters", "Audition",
    "Ringu", "Ju-On", "Dark Water", "Pulse", "One Missed Call",
    "The Eye", "Shutter", "Goodnight Mommy", "Raw", "Titane",
    // Horror comedy
    "Tucker and Dale vs Evil", "What We Do in the Shadows", "Ready or Not",
    "The Menu", "Bodies Bodies Bodies", "Werewolves Within", "Willy's Wonderland",
    "The Babysitter", "Little Monsters", "Scouts Guide to the Zombie Apocalypse",
    // Anthologies
    "Tales from the Crypt", "Tales from the Hood", "Trick 'r Treat",
    "The ABCs of Death", "Southbound", "The Mortuary Collection",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_list_has_repeats() {
        let unique: HashSet<&str> = HORROR_MOVIES.iter().copied().collect();
        assert!(unique.len() < HORROR_MOVIES.len());
        assert!(unique.contains("Dawn of the Dead"));
    }
}
