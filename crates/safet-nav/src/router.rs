// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::NavEffect;

/// Consumer of controller output.
///
/// Implementations switch the visible page (leaving it alone when
/// `view_index` is `None`), restyle the listed rows, and start the declared
/// animations. They never write navigation state back.
pub trait ViewRouter {
    fn on_effect(&mut self, effect: &NavEffect);

    fn apply_all<'a, I>(&mut self, effects: I)
    where
        I: IntoIterator<Item = &'a NavEffect>,
        Self: Sized,
    {
        for effect in effects {
            if !effect.is_empty() {
                self.on_effect(effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewRouter;
    use crate::{NavEffect, NavItemId, Restyle};

    #[derive(Default)]
    struct Recorder {
        seen: Vec<NavEffect>,
    }

    impl ViewRouter for Recorder {
        fn on_effect(&mut self, effect: &NavEffect) {
            self.seen.push(effect.clone());
        }
    }

    #[test]
    fn apply_all_skips_empty_effects() {
        let restyle = NavEffect {
            items_to_restyle: vec![Restyle::active(NavItemId::new(1))],
            ..NavEffect::default()
        };
        let effects = [NavEffect::default(), restyle.clone(), NavEffect::default()];

        let mut recorder = Recorder::default();
        recorder.apply_all(&effects);
        assert_eq!(recorder.seen, vec![restyle]);
    }
}
