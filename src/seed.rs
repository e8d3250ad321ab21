//! Built-in starter corpus
//!
//! A handful of summaries of common legal topics in Côte d'Ivoire, used to
//! populate an empty knowledge base before the first harvest. Ids are fixed
//! so re-seeding upserts instead of duplicating.

use chrono::Utc;

use crate::document::Document;
use crate::util::truncate_chars;

const PREVIEW_CHARS: usize = 500;

/// Build the seed documents. Content is regenerated per call so
/// `scraped_at` reflects the seeding time.
pub fn seed_documents() -> Vec<Document> {
    SEED_ENTRIES
        .iter()
        .map(|entry| Document {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            category: entry.category.to_string(),
            content: entry.content.to_string(),
            content_preview: truncate_chars(entry.content, PREVIEW_CHARS),
            source_url: entry.source_url.to_string(),
            scraped_at: Utc::now(),
        })
        .collect()
}

struct SeedEntry {
    id: &'static str,
    title: &'static str,
    category: &'static str,
    source_url: &'static str,
    content: &'static str,
}

const SEED_ENTRIES: &[SeedEntry] = &[
    SeedEntry {
        id: "seed_sarl_001",
        title: "Création d'une SARL en Côte d'Ivoire",
        category: "droit_des_societes",
        source_url: "https://www.cepici.gouv.ci/",
        content: "La société à responsabilité limitée (SARL) est la forme de société \
            la plus répandue en Côte d'Ivoire. Sa constitution est régie par l'Acte \
            uniforme OHADA relatif au droit des sociétés commerciales. Le capital \
            social minimum est librement fixé par les statuts depuis la réforme de \
            2014. Les formalités de création passent par le guichet unique du CEPICI : \
            rédaction des statuts, dépôt du capital, immatriculation au Registre du \
            commerce et du crédit mobilier (RCCM), déclaration fiscale d'existence et \
            affiliation à la CNPS. Le délai de création est en principe de 24 heures \
            lorsque le dossier est complet. La SARL peut être constituée par un \
            associé unique ou par plusieurs associés, dont la responsabilité est \
            limitée au montant de leurs apports.",
    },
    SeedEntry {
        id: "seed_travail_001",
        title: "Contrat de travail et Code du travail ivoirien",
        category: "droit_du_travail",
        source_url: "https://www.emploi.gouv.ci/",
        content: "Le Code du travail ivoirien (loi n° 2015-532 du 20 juillet 2015) \
            encadre les relations individuelles et collectives de travail. Le contrat \
            de travail peut être conclu à durée déterminée ou indéterminée ; le CDD ne \
            peut excéder deux ans, renouvellements compris. La durée légale du travail \
            est de 40 heures par semaine dans les entreprises non agricoles. Le \
            licenciement doit reposer sur un motif légitime et respecter un préavis \
            dont la durée dépend de l'ancienneté et de la catégorie professionnelle du \
            salarié. Les salariés bénéficient d'un congé payé d'au moins 2,2 jours \
            ouvrables par mois de service effectif. Les litiges individuels relèvent \
            du tribunal du travail après une tentative de règlement amiable devant \
            l'inspecteur du travail.",
    },
    SeedEntry {
        id: "seed_fiscal_001",
        title: "Fiscalité des entreprises en Côte d'Ivoire",
        category: "droit_fiscal",
        source_url: "https://www.dgi.gouv.ci/",
        content: "Les entreprises établies en Côte d'Ivoire sont soumises à l'impôt \
            sur les bénéfices industriels et commerciaux (BIC) au taux de droit commun \
            de 25 %. La taxe sur la valeur ajoutée (TVA) s'applique au taux normal de \
            18 %, avec un taux réduit de 9 % pour certains produits. Les petites \
            entreprises peuvent relever du régime de l'entreprenant ou du régime des \
            microentreprises selon leur chiffre d'affaires. Les déclarations et \
            paiements s'effectuent auprès de la Direction générale des impôts (DGI), \
            de plus en plus par voie dématérialisée via la plateforme e-impôts. Des \
            exonérations temporaires sont prévues par le Code des investissements pour \
            les entreprises agréées, en fonction de la zone d'implantation et du \
            secteur d'activité.",
    },
    SeedEntry {
        id: "seed_ohada_001",
        title: "Le droit OHADA et son application en Côte d'Ivoire",
        category: "droit_ohada",
        source_url: "https://www.ohada.org/",
        content: "La Côte d'Ivoire est membre fondateur de l'Organisation pour \
            l'harmonisation en Afrique du droit des affaires (OHADA), créée par le \
            traité de Port-Louis du 17 octobre 1993. Les Actes uniformes OHADA sont \
            directement applicables dans l'ordre juridique interne et priment sur les \
            dispositions nationales contraires. Ils couvrent notamment le droit \
            commercial général, le droit des sociétés commerciales, les sûretés, les \
            procédures simplifiées de recouvrement, les procédures collectives \
            d'apurement du passif et le droit de l'arbitrage. Le contentieux de \
            l'interprétation et de l'application des Actes uniformes relève en \
            cassation de la Cour commune de justice et d'arbitrage (CCJA), dont le \
            siège est à Abidjan.",
    },
    SeedEntry {
        id: "seed_invest_001",
        title: "Code des investissements et garanties de l'investisseur",
        category: "droit_des_investissements",
        source_url: "https://www.cepici.gouv.ci/",
        content: "Le Code des investissements ivoirien (ordonnance n° 2018-646 du \
            1er août 2018) vise à encourager les investissements productifs. Il offre \
            deux régimes d'incitation : la déclaration pour les investissements \
            inférieurs à un seuil fixé par décret, et l'agrément pour les projets plus \
            importants. Les avantages comprennent des exonérations de droits de douane \
            et de TVA pendant la phase de réalisation, ainsi que des crédits d'impôt \
            pendant la phase d'exploitation, modulés selon la zone d'implantation. Le \
            code garantit aux investisseurs la liberté de transfert des capitaux et \
            des revenus, la protection contre l'expropriation hors cause d'utilité \
            publique avec juste indemnisation, et l'accès aux mécanismes d'arbitrage \
            international, dont le CIRDI.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_corpus_is_well_formed() {
        let docs = seed_documents();
        assert_eq!(docs.len(), 5);
        for doc in &docs {
            assert!(doc.id.starts_with("seed_"), "id {}", doc.id);
            assert!(doc.content.chars().count() >= 100);
            assert!(doc.content_preview.chars().count() <= 500);
            assert!(!doc.title.is_empty());
            assert!(!doc.category.is_empty());
        }
    }

    #[test]
    fn seed_ids_are_unique_and_stable() {
        let first = seed_documents();
        let second = seed_documents();
        let ids: Vec<_> = first.iter().map(|d| d.id.clone()).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
        assert_eq!(
            ids,
            second.iter().map(|d| d.id.clone()).collect::<Vec<_>>()
        );
    }
}
