//! Sound playback through the page's `<audio>` elements
//!
//! Playback is fire-and-forget: a missing element or a rejected play
//! promise is logged and swallowed, never surfaced to the simulation.

use crate::sim::SoundId;

#[cfg(target_arch = "wasm32")]
use web_sys::HtmlAudioElement;

/// DOM element id for a sound
#[cfg(target_arch = "wasm32")]
fn element_id(id: SoundId) -> &'static str {
    match id {
        SoundId::PlayerShoot => "playerShootSound",
        SoundId::BotShoot => "botShootSound",
        SoundId::PlayerHit => "playerHitSound",
        SoundId::BotHit => "botHitSound",
        SoundId::Win => "winSound",
        SoundId::Lose => "loseSound",
        SoundId::Upgrade => "upgradeSound",
        SoundId::ButtonClick => "buttonClickSound",
        SoundId::NoGold => "noGoldSound",
    }
}

#[cfg(target_arch = "wasm32")]
const ALL_SOUNDS: [SoundId; 9] = [
    SoundId::PlayerShoot,
    SoundId::BotShoot,
    SoundId::PlayerHit,
    SoundId::BotHit,
    SoundId::Win,
    SoundId::Lose,
    SoundId::Upgrade,
    SoundId::ButtonClick,
    SoundId::NoGold,
];

/// Resolved audio elements, looked up once at startup
#[cfg(target_arch = "wasm32")]
pub struct AudioBank {
    elements: Vec<(SoundId, HtmlAudioElement)>,
}

#[cfg(target_arch = "wasm32")]
impl AudioBank {
    pub fn new() -> Self {
        use wasm_bindgen::JsCast;

        let mut elements = Vec::new();
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(document) = document {
            for id in ALL_SOUNDS {
                match document
                    .get_element_by_id(element_id(id))
                    .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
                {
                    Some(el) => elements.push((id, el)),
                    None => log::warn!("Audio element #{} missing - sound muted", element_id(id)),
                }
            }
        } else {
            log::warn!("No document - audio disabled");
        }
        Self { elements }
    }

    /// Play a sound from the start at the given volume (0.0 - 1.0)
    pub fn play(&self, id: SoundId, volume: f32) {
        if let Some((_, el)) = self.elements.iter().find(|(sid, _)| *sid == id) {
            el.set_current_time(0.0);
            el.set_volume(volume.clamp(0.0, 1.0) as f64);
            if let Err(e) = el.play() {
                // Autoplay restrictions reject until the first user gesture
                log::debug!("Sound {id:?} not played: {e:?}");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for AudioBank {
    fn default() -> Self {
        Self::new()
    }
}

/// Native stub: sounds are logged at trace level only
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
pub struct AudioBank;

#[cfg(not(target_arch = "wasm32"))]
impl AudioBank {
    pub fn new() -> Self {
        Self
    }

    pub fn play(&self, id: SoundId, volume: f32) {
        log::trace!("play {id:?} at {volume}");
    }
}
