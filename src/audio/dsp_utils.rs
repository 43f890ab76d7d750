// Utilitaires DSP - Hygiène audio du callback temps-réel

/// Flush denormals to zero (anti-dénormaux)
///
/// Les nombres dénormaux (très proches de 0) peuvent causer des
/// ralentissements CPU importants sur certains processeurs.
///
/// Seuil: 1e-15 (largement sous le bruit numérique à 32-bit float)
#[inline]
pub fn flush_denormals_to_zero(x: f32) -> f32 {
    if x.abs() < 1e-15 { 0.0 } else { x }
}

/// Soft clipping avec tanh (saturation douce)
///
/// Limite doucement la sortie audio dans [-1, 1] sans créer de distorsion
/// dure. Le fanfare + ambiance peuvent se superposer; tanh absorbe les
/// crêtes sans craquement.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    x.tanh()
}
