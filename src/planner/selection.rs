use super::ledger::MemberLedger;
use crate::model::ShiftType;
use chrono::NaiveDate;

/// Clé secondaire du tri : 1 seulement si tous les turni du catalogue sont égaux à celui de la veille.
///
/// Avec plus d'un type de turno elle vaut toujours 0.
pub(super) fn rotation_priority(ledger: &MemberLedger, date: NaiveDate, catalog: &[ShiftType]) -> u8 {
    match ledger.last_shift_before(date) {
        None => 0,
        Some(last) if catalog.iter().any(|s| s.name() != last.name()) => 0,
        Some(_) => 1,
    }
}

/// Tirage sans remise dans une copie du catalogue, rechargée quand elle est épuisée.
///
/// Un candidat par entrée de `previous` (turno de la veille de chaque membre, dans l'ordre trié).
///
/// Après une recharge, la règle reste la même : on prend la première entrée différente
/// du turno de la veille, pas la tête du pool.
pub(super) fn pick_shifts<'a>(
    previous: &[Option<ShiftType>],
    catalog: &'a [ShiftType],
) -> Vec<&'a ShiftType> {
    if catalog.is_empty() {
        return Vec::new();
    }
    let mut pool: Vec<&'a ShiftType> = Vec::with_capacity(catalog.len());

    previous
        .iter()
        .map(|last| {
            if pool.is_empty() {
                pool.extend(catalog.iter());
            }
            let idx = last
                .as_ref()
                .and_then(|last| pool.iter().position(|s| s.name() != last.name()))
                .unwrap_or(0);
            pool.remove(idx)
        })
        .collect()
}
