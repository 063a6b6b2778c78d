//! Localized strings for spoken cues, reality-check messages and the
//! built-in weekly routines.
//!
//! Aranese borrows the Catalan table; Basque and Galician borrow Spanish.

use crate::calendar::RoutineKey;
use crate::profile::Language;

/// Phrases used outside the routine calendar.
#[derive(Debug)]
pub struct Phrases {
    pub break_start: &'static str,
    pub break_end: &'static str,
    pub five_minutes_left: &'static str,
    pub time_up: &'static str,
    pub reality_too_fast: &'static str,
    pub reality_too_slow: &'static str,
    pub chat_fallback: &'static str,
    pub new_entry: &'static str,
}

const EN: Phrases = Phrases {
    break_start: "Break time! Stand up and stretch for three minutes.",
    break_end: "Break is over. Back to work!",
    five_minutes_left: "Five minutes left. You're almost there!",
    time_up: "Time's up!",
    reality_too_fast: "Careful! That seems too fast. It usually takes about",
    reality_too_slow: "That's a lot of time! It usually takes about",
    chat_fallback: "Hmm, I couldn't think of anything.",
    new_entry: "New task",
};

const ES: Phrases = Phrases {
    break_start: "¡Hora del descanso! Levántate y estírate tres minutos.",
    break_end: "Se acabó el descanso. ¡A trabajar!",
    five_minutes_left: "Quedan cinco minutos. ¡Ya casi lo tienes!",
    time_up: "¡Se acabó el tiempo!",
    reality_too_fast: "¡Cuidado! Parece demasiado rápido. Normalmente se tarda unos",
    reality_too_slow: "¡Es mucho tiempo! Normalmente se tarda unos",
    chat_fallback: "Hmm, no he podido pensar en nada.",
    new_entry: "Nueva tarea",
};

const CA: Phrases = Phrases {
    break_start: "Hora del descans! Aixeca't i estira't tres minuts.",
    break_end: "S'ha acabat el descans. A treballar!",
    five_minutes_left: "Queden cinc minuts. Ja gairebé ho tens!",
    time_up: "S'ha acabat el temps!",
    reality_too_fast: "Compte! Sembla massa ràpid. Normalment es triga uns",
    reality_too_slow: "És molt de temps! Normalment es triga uns",
    chat_fallback: "Hmm, no se m'ha acudit res.",
    new_entry: "Nova tasca",
};

const FR: Phrases = Phrases {
    break_start: "C'est la pause ! Lève-toi et étire-toi trois minutes.",
    break_end: "La pause est finie. Au travail !",
    five_minutes_left: "Plus que cinq minutes. Tu y es presque !",
    time_up: "Le temps est écoulé !",
    reality_too_fast: "Attention ! Cela semble trop rapide. Il faut généralement environ",
    reality_too_slow: "C'est beaucoup de temps ! Il faut généralement environ",
    chat_fallback: "Hmm, je n'ai rien trouvé.",
    new_entry: "Nouvelle tâche",
};

const DE: Phrases = Phrases {
    break_start: "Pause! Steh auf und streck dich drei Minuten lang.",
    break_end: "Die Pause ist vorbei. Zurück an die Arbeit!",
    five_minutes_left: "Noch fünf Minuten. Du hast es fast geschafft!",
    time_up: "Die Zeit ist um!",
    reality_too_fast: "Vorsicht! Das scheint zu schnell. Normalerweise dauert es etwa",
    reality_too_slow: "Das ist viel Zeit! Normalerweise dauert es etwa",
    chat_fallback: "Hmm, mir ist nichts eingefallen.",
    new_entry: "Neue Aufgabe",
};

const IT: Phrases = Phrases {
    break_start: "È ora della pausa! Alzati e fai stretching per tre minuti.",
    break_end: "La pausa è finita. Al lavoro!",
    five_minutes_left: "Mancano cinque minuti. Ci sei quasi!",
    time_up: "Tempo scaduto!",
    reality_too_fast: "Attenzione! Sembra troppo veloce. Di solito ci vogliono circa",
    reality_too_slow: "È tanto tempo! Di solito ci vogliono circa",
    chat_fallback: "Hmm, non mi è venuto in mente niente.",
    new_entry: "Nuova attività",
};

pub fn phrases(lang: Language) -> &'static Phrases {
    match lang {
        Language::English => &EN,
        Language::Spanish | Language::Basque | Language::Galician => &ES,
        Language::Catalan | Language::Aranese => &CA,
        Language::French => &FR,
        Language::German => &DE,
        Language::Italian => &IT,
    }
}

/// Title of a built-in routine entry in the given language.
pub fn routine_title(lang: Language, key: RoutineKey) -> &'static str {
    use RoutineKey::*;
    let table: [&'static str; 18] = match lang {
        Language::English => [
            "Wake up", "Get dressed", "Breakfast", "Brush teeth", "School", "Lunch",
            "Shower", "Pack backpack", "Dinner", "Sleep", "Morning routines",
            "High school", "Medication and wake up", "Coffee and planning",
            "Deep work block", "Second work block", "Commute home", "Wind down",
        ],
        Language::Spanish | Language::Basque | Language::Galician => [
            "Despertarse", "Vestirse", "Desayuno", "Lavarse los dientes", "Colegio",
            "Comida", "Ducha", "Preparar la mochila", "Cena", "Dormir",
            "Rutinas de la mañana", "Instituto", "Medicación y despertar",
            "Café y planificación", "Bloque de trabajo profundo",
            "Segundo bloque de trabajo", "Vuelta a casa", "Desconectar",
        ],
        Language::Catalan | Language::Aranese => [
            "Despertar-se", "Vestir-se", "Esmorzar", "Rentar-se les dents", "Escola",
            "Dinar", "Dutxa", "Preparar la motxilla", "Sopar", "Dormir",
            "Rutines del matí", "Institut", "Medicació i despertar",
            "Cafè i planificació", "Bloc de treball profund",
            "Segon bloc de treball", "Tornada a casa", "Desconnectar",
        ],
        Language::French => [
            "Se réveiller", "S'habiller", "Petit-déjeuner", "Se brosser les dents",
            "École", "Déjeuner", "Douche", "Préparer le cartable", "Dîner", "Dormir",
            "Routines du matin", "Lycée", "Médicaments et réveil",
            "Café et planification", "Bloc de travail profond",
            "Deuxième bloc de travail", "Retour à la maison", "Décompresser",
        ],
        Language::German => [
            "Aufstehen", "Anziehen", "Frühstück", "Zähne putzen", "Schule",
            "Mittagessen", "Duschen", "Rucksack packen", "Abendessen", "Schlafen",
            "Morgenroutine", "Gymnasium", "Medikamente und Aufwachen",
            "Kaffee und Planung", "Fokusblock", "Zweiter Arbeitsblock",
            "Heimweg", "Abschalten",
        ],
        Language::Italian => [
            "Sveglia", "Vestirsi", "Colazione", "Lavarsi i denti", "Scuola",
            "Pranzo", "Doccia", "Preparare lo zaino", "Cena", "Dormire",
            "Routine del mattino", "Liceo", "Farmaci e risveglio",
            "Caffè e pianificazione", "Blocco di lavoro profondo",
            "Secondo blocco di lavoro", "Rientro a casa", "Rilassarsi",
        ],
    };
    let idx = match key {
        Wake => 0,
        Dress => 1,
        Breakfast => 2,
        Teeth => 3,
        School => 4,
        Lunch => 5,
        Shower => 6,
        Pack => 7,
        Dinner => 8,
        Sleep => 9,
        Routines => 10,
        HighSchool => 11,
        Meds => 12,
        Coffee => 13,
        Work1 => 14,
        Work2 => 15,
        Home => 16,
        WindDown => 17,
    };
    table[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regional_languages_borrow_a_table() {
        assert_eq!(phrases(Language::Aranese).break_end, CA.break_end);
        assert_eq!(phrases(Language::Galician).time_up, ES.time_up);
    }

    #[test]
    fn routine_titles_are_localized() {
        assert_eq!(routine_title(Language::English, RoutineKey::Teeth), "Brush teeth");
        assert_eq!(routine_title(Language::Catalan, RoutineKey::Dinner), "Sopar");
    }
}
