//! Built-in element catalogs. These ship with the engine so a fresh install
//! produces usable feeds before any catalog file is authored; the JSON
//! override in `LibraryCatalog::load` replaces them wholesale.

use super::ElementLibrary;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn outfits(category: &str, style: &str) -> Vec<String> {
    match (category, style) {
        ("urban", "casual") => strings(&[
            "oversized cream knit sweater with straight-leg jeans and white leather sneakers",
            "black cropped leather jacket over a white tee with high-waisted mom jeans",
            "olive utility jumpsuit with chunky ankle boots",
            "grey hoodie layered under a camel wool overcoat with black slim trousers",
            "vintage denim jacket over a floral midi slip dress",
            "ribbed beige lounge set with a longline cardigan",
        ]),
        ("urban", "business") => strings(&[
            "tailored charcoal pantsuit with a white silk blouse",
            "navy pencil dress with a structured cream blazer",
            "black turtleneck tucked into high-waisted plaid trousers",
            "camel trench coat over a monochrome knit midi dress",
            "pinstripe waistcoat and matching wide-leg trousers",
            "emerald satin shirt with black cigarette pants",
        ]),
        ("urban", "athletic") => strings(&[
            "matching graphite seamless leggings and longline sports bra",
            "black windbreaker over a neon racerback tank with running shorts",
            "ivory ribbed yoga set with an oversized zip hoodie",
            "burgundy track jacket with matching joggers",
            "grey compression top with mesh-panel leggings",
            "white tennis skirt with a cropped performance polo",
        ]),
        ("coastal", "casual") => strings(&[
            "white linen sundress with woven leather sandals",
            "striped boat-neck top with rolled chino shorts",
            "flowing terracotta maxi skirt with a knotted white tee",
            "light-wash denim shorts with a crochet halter top",
            "sage green linen co-ord set with espadrilles",
            "oversized chambray shirt worn open over a ribbed swimsuit",
        ]),
        ("coastal", "business") => strings(&[
            "ivory linen suit with a silk camisole",
            "sky-blue shirt dress with a woven belt",
            "white wide-leg trousers with a navy double-breasted blazer",
            "sand-toned wrap dress with gold-buckle slides",
            "pale linen waistcoat with matching tailored shorts",
            "seafoam silk blouse with cream palazzo pants",
        ]),
        ("coastal", "athletic") => strings(&[
            "coral one-piece swimsuit with a mesh cover-up",
            "white tennis dress with a visor",
            "aqua rash guard with board shorts",
            "sand-toned yoga set with a linen overshirt",
            "navy running shorts with a breathable white tank",
            "mint cropped windbreaker with bike shorts",
        ]),
        ("studio", "casual") => strings(&[
            "slouchy black turtleneck with raw-hem straight jeans",
            "white poplin shirt half-tucked into vintage levis",
            "heather grey knit dress with tall suede boots",
            "boxy cropped denim jacket over a black bodysuit",
            "camel knit vest layered over a crisp white tee",
            "charcoal wool jumper with tailored black joggers",
        ]),
        ("studio", "business") => strings(&[
            "sculptural ivory blazer dress with pointed heels",
            "black cigarette trousers with a bow-neck champagne blouse",
            "monochrome dove-grey suit with a fine-knit shell",
            "high-neck burgundy sheath dress with a thin gold belt",
            "cream turtleneck under a sleeveless longline vest",
            "espresso pleated midi skirt with a fitted black blazer",
        ]),
        ("studio", "athletic") => strings(&[
            "matte black sculpting bodysuit with sheer-panel leggings",
            "dove grey seamless set with a cropped sweatshirt",
            "white high-neck sports bra with matching sculpt shorts",
            "plum strappy-back onesie with ballet-style wrap top",
            "slate ribbed tank with wide-band studio leggings",
            "ecru knit flare pants with a fitted longline bra top",
        ]),
        _ => Vec::new(),
    }
}

fn locations(category: &str) -> Vec<String> {
    match category {
        "urban" => strings(&[
            "a rain-darkened cobblestone street in the old town",
            "a rooftop terrace overlooking the skyline",
            "a sunlit corner cafe with marble tables",
            "a graffiti-lined alley with warm brick walls",
            "the steps of a brutalist museum entrance",
            "a crosswalk in the downtown shopping district",
        ]),
        "coastal" => strings(&[
            "a white-sand beach at the edge of turquoise water",
            "a weathered wooden pier stretching into the sea",
            "a clifftop path above the breaking waves",
            "a pastel beach town promenade lined with palms",
            "the deck of a moored sailboat in the marina",
            "a dune trail with tall seagrass on both sides",
        ]),
        "studio" => strings(&[
            "a seamless warm-grey studio backdrop",
            "a daylight studio with floor-to-ceiling windows",
            "a minimalist loft with white-painted brick",
            "a dark studio with a single textured canvas backdrop",
            "an industrial studio space with polished concrete floors",
            "a sun-washed atelier corner with linen drapes",
        ]),
        _ => Vec::new(),
    }
}

fn accessories(style: &str) -> Vec<String> {
    match style {
        "casual" => strings(&[
            "thin gold hoop earrings",
            "a woven crossbody bag",
            "tortoiseshell sunglasses",
            "a stack of delicate rings",
        ]),
        "business" => strings(&[
            "a slim leather portfolio",
            "pearl stud earrings",
            "a minimalist steel watch",
            "a structured top-handle bag",
        ]),
        "athletic" => strings(&[
            "wireless earbuds",
            "a sleek water bottle",
            "a fitness band on her wrist",
            "a low ponytail with a claw clip",
        ]),
        _ => Vec::new(),
    }
}

fn lighting(category: &str, mood: &str) -> Vec<String> {
    match (category, mood) {
        ("urban", "confident") => strings(&[
            "warm golden hour light raking across the buildings",
            "soft overcast daylight with no harsh shadows",
            "late afternoon sun with long crisp shadows",
            "cool blue-hour glow with warm shop-window spill",
        ]),
        ("coastal", "serene") => strings(&[
            "hazy morning light diffused by sea mist",
            "bright midday sun bounced off the white sand",
            "pastel sunset light with a soft pink horizon",
            "golden backlight with the sun low over the water",
        ]),
        ("studio", "editorial") => strings(&[
            "a single large softbox at forty-five degrees",
            "hard directional beauty light with a silver reflector fill",
            "wraparound window light with a white bounce",
            "low-key rim lighting against a dark backdrop",
        ]),
        _ => Vec::new(),
    }
}

pub fn builtin_libraries() -> Vec<ElementLibrary> {
    let mut libraries = Vec::new();
    for (category, mood) in [
        ("urban", "confident"),
        ("coastal", "serene"),
        ("studio", "editorial"),
    ] {
        for style in ["casual", "business", "athletic"] {
            libraries.push(ElementLibrary {
                category: category.to_string(),
                mood: mood.to_string(),
                fashion_style: style.to_string(),
                outfits: outfits(category, style),
                locations: locations(category),
                accessories: accessories(style),
                lighting: lighting(category, mood),
            });
        }
    }
    libraries
}
