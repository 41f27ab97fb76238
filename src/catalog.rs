//! Compiled-in track list.

/// One playable item with its metadata and cover art.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub title: &'static str,
    pub artist: &'static str,
    pub src: &'static str,
    pub cover: &'static str,
}

pub const TRACKS: [Track; 3] = [
    Track {
        title: "Sunset Vibes",
        artist: "Ocean Beats",
        src: "/music/sunset.wav",
        cover: "/covers/sunset.png",
    },
    Track {
        title: "City Lights",
        artist: "Midnight Run",
        src: "/music/city.wav",
        cover: "/covers/city.png",
    },
    Track {
        title: "Dreamscape",
        artist: "Skyline",
        src: "/music/dream.wav",
        cover: "/covers/dream.png",
    },
];

/// Look up a track, falling back to the first entry for out-of-range indices.
pub fn track_at(index: usize) -> &'static Track {
    TRACKS.get(index).unwrap_or(&TRACKS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_index_falls_back_to_first_track() {
        assert_eq!(track_at(1).title, "City Lights");
        assert_eq!(track_at(99).title, "Sunset Vibes");
    }
}
