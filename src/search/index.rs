//! Corpus-to-index flattening.

use std::collections::HashSet;

use crate::corpus::{Certification, Corpus, Experience, Project, SkillCategory};
use crate::search::{RecordData, RecordType, SearchRecord, SkillEntry};

/// The searchable form of a corpus, built once and never mutated.
///
/// Records are kept in three sub-indexes. Certifications share the skills
/// sub-index and follow every individual skill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchIndex {
    projects: Vec<SearchRecord>,
    skills: Vec<SearchRecord>,
    experience: Vec<SearchRecord>,
}

impl SearchIndex {
    /// Build the index from a corpus.
    ///
    /// Entries without anything to title them are skipped; missing fields
    /// contribute nothing to the search text.
    #[must_use]
    pub fn build(corpus: &Corpus) -> Self {
        let mut ids = IdAllocator::default();

        let projects = index_projects(&corpus.projects, &mut ids);
        let mut skills = index_skills(&corpus.skills.technical, &mut ids);
        skills.extend(index_certifications(&corpus.skills.certifications, &mut ids));
        let experience = index_experience(&corpus.experience, &mut ids);

        tracing::debug!(
            projects = projects.len(),
            skills = skills.len(),
            experience = experience.len(),
            "built search index"
        );

        Self {
            projects,
            skills,
            experience,
        }
    }

    #[must_use]
    pub fn projects(&self) -> &[SearchRecord] {
        &self.projects
    }

    #[must_use]
    pub fn skills(&self) -> &[SearchRecord] {
        &self.skills
    }

    #[must_use]
    pub fn experience(&self) -> &[SearchRecord] {
        &self.experience
    }

    /// The sub-index holding records of `kind`.
    #[must_use]
    pub fn sub_index(&self, kind: RecordType) -> &[SearchRecord] {
        match kind {
            RecordType::Project => &self.projects,
            RecordType::Skill | RecordType::Certification => &self.skills,
            RecordType::Experience => &self.experience,
        }
    }

    /// Records of exactly `kind`, in index order.
    pub fn of_type(&self, kind: RecordType) -> impl Iterator<Item = &SearchRecord> {
        self.sub_index(kind).iter().filter(move |r| r.kind == kind)
    }

    /// Every record: projects, then skills and certifications, then experience.
    pub fn all(&self) -> impl Iterator<Item = &SearchRecord> {
        self.projects
            .iter()
            .chain(&self.skills)
            .chain(&self.experience)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len() + self.skills.len() + self.experience.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hands out ids, suffixing repeats with `-2`, `-3`, ...
#[derive(Default)]
struct IdAllocator {
    seen: HashSet<String>,
}

impl IdAllocator {
    fn allocate(&mut self, base: String) -> String {
        if self.seen.insert(base.clone()) {
            return base;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Lowercase, with whitespace runs collapsed to single hyphens.
#[must_use]
pub fn slugify(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Join the non-blank parts with single spaces and lowercase the result.
fn search_text(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn anchor(section: &str, fragment: &str) -> String {
    let slug = slugify(fragment);
    if slug.is_empty() {
        format!("/{section}")
    } else {
        format!("/{section}#{slug}")
    }
}

fn index_projects(projects: &[Project], ids: &mut IdAllocator) -> Vec<SearchRecord> {
    let mut records = Vec::with_capacity(projects.len());

    for (position, project) in projects.iter().enumerate() {
        if project.title.trim().is_empty() {
            tracing::debug!(position, "skipping project without a title");
            continue;
        }

        let base = project
            .id
            .as_ref()
            .map_or_else(|| format!("project-{}", position + 1), ToString::to_string);
        let id = ids.allocate(base);

        let technologies = project.technologies.join(" ");
        let outcomes = project.outcomes.join(" ");
        let text = search_text(&[
            &project.title,
            &project.category,
            &project.client,
            &project.description,
            &project.challenge,
            &project.solution,
            &technologies,
            &outcomes,
        ]);

        records.push(SearchRecord {
            url: format!("/projects#{id}"),
            id,
            kind: RecordType::Project,
            title: project.title.clone(),
            category: project.category.clone(),
            search_text: text,
            data: RecordData::Project(project.clone()),
        });
    }

    records
}

fn index_skills(categories: &[SkillCategory], ids: &mut IdAllocator) -> Vec<SearchRecord> {
    let mut records = Vec::new();

    for category in categories {
        let url = anchor("skills", &category.category);

        for skill in &category.skills {
            if skill.trim().is_empty() {
                tracing::debug!(category = %category.category, "skipping blank skill");
                continue;
            }

            records.push(SearchRecord {
                id: ids.allocate(format!("skill-{}", slugify(skill))),
                kind: RecordType::Skill,
                title: skill.clone(),
                category: category.category.clone(),
                search_text: search_text(&[skill, &category.category, "technical"]),
                url: url.clone(),
                data: RecordData::Skill(SkillEntry {
                    skill: skill.clone(),
                    category: category.category.clone(),
                }),
            });
        }
    }

    records
}

fn index_certifications(certs: &[Certification], ids: &mut IdAllocator) -> Vec<SearchRecord> {
    let mut records = Vec::with_capacity(certs.len());

    for cert in certs {
        if cert.name.trim().is_empty() {
            tracing::debug!(issuer = %cert.issuer, "skipping certification without a name");
            continue;
        }

        records.push(SearchRecord {
            id: ids.allocate(format!("cert-{}", slugify(&cert.name))),
            kind: RecordType::Certification,
            title: cert.name.clone(),
            category: "Certifications".to_string(),
            search_text: search_text(&[&cert.name, &cert.issuer, "certification"]),
            url: "/skills#certifications".to_string(),
            data: RecordData::Certification(cert.clone()),
        });
    }

    records
}

fn index_experience(entries: &[Experience], ids: &mut IdAllocator) -> Vec<SearchRecord> {
    let mut records = Vec::with_capacity(entries.len());

    for (position, exp) in entries.iter().enumerate() {
        let role = exp.role.trim();
        let company = exp.company.trim();

        let title = match (role.is_empty(), company.is_empty()) {
            (true, true) => {
                tracing::debug!(position, "skipping experience without role or company");
                continue;
            }
            (false, true) => role.to_string(),
            (true, false) => company.to_string(),
            (false, false) => format!("{role} at {company}"),
        };

        let slug_source = if company.is_empty() { role } else { company };
        let achievements = exp.achievements.join(" ");
        let technologies = exp.technologies.join(" ");

        records.push(SearchRecord {
            id: ids.allocate(format!("exp-{}", slugify(slug_source))),
            kind: RecordType::Experience,
            title,
            category: "Experience".to_string(),
            search_text: search_text(&[
                &exp.role,
                &exp.company,
                &exp.description,
                &achievements,
                &technologies,
            ]),
            url: anchor("experience", company),
            data: RecordData::Experience(exp.clone()),
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Skills;

    fn sample_corpus() -> Corpus {
        Corpus {
            projects: vec![Project {
                id: Some(crate::corpus::ProjectId::Number(1)),
                title: "Digital Portal".to_string(),
                category: "Digital Platform".to_string(),
                technologies: vec!["React".to_string(), "Azure".to_string()],
                ..Project::default()
            }],
            skills: Skills {
                technical: vec![SkillCategory {
                    category: "Cloud & Modern Technology".to_string(),
                    level: None,
                    skills: vec!["AWS".to_string(), "Azure OpenAI".to_string()],
                }],
                certifications: vec![Certification {
                    name: "TOGAF Level 2".to_string(),
                    issuer: "The Open Group".to_string(),
                    level: None,
                }],
            },
            experience: vec![
                Experience {
                    role: "Architect".to_string(),
                    company: "Finance and Banking".to_string(),
                    ..Experience::default()
                },
                Experience {
                    role: "Lead Architect".to_string(),
                    company: "Finance and Banking".to_string(),
                    ..Experience::default()
                },
            ],
        }
    }

    mod slugify_tests {
        use super::*;

        #[test]
        fn spaces_become_hyphens() {
            assert_eq!(slugify("Azure OpenAI"), "azure-openai");
        }

        #[test]
        fn whitespace_runs_collapse() {
            assert_eq!(slugify("Big   Data\tLake"), "big-data-lake");
        }

        #[test]
        fn punctuation_is_kept() {
            assert_eq!(slugify("CIAM/IAM"), "ciam/iam");
        }
    }

    #[test]
    fn one_record_per_skill() {
        let index = SearchIndex::build(&sample_corpus());

        let skills: Vec<_> = index
            .skills()
            .iter()
            .filter(|r| r.kind == RecordType::Skill)
            .collect();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[1].id, "skill-azure-openai");
        assert_eq!(skills[1].search_text, "azure openai cloud & modern technology technical");
        assert_eq!(skills[1].url, "/skills#cloud-&-modern-technology");
    }

    #[test]
    fn certifications_follow_skills() {
        let index = SearchIndex::build(&sample_corpus());

        let last = index.skills().last().unwrap();
        assert_eq!(last.kind, RecordType::Certification);
        assert_eq!(last.id, "cert-togaf-level-2");
        assert_eq!(last.category, "Certifications");
        assert_eq!(last.search_text, "togaf level 2 the open group certification");
    }

    #[test]
    fn project_uses_corpus_id_and_skips_missing_fields() {
        let index = SearchIndex::build(&sample_corpus());

        let project = &index.projects()[0];
        assert_eq!(project.id, "1");
        assert_eq!(project.url, "/projects#1");
        assert_eq!(project.search_text, "digital portal digital platform react azure");
    }

    #[test]
    fn repeated_companies_get_distinct_ids() {
        let index = SearchIndex::build(&sample_corpus());

        let ids: Vec<_> = index.experience().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["exp-finance-and-banking", "exp-finance-and-banking-2"]);
        assert_eq!(index.experience()[0].title, "Architect at Finance and Banking");
        assert_eq!(index.experience()[0].url, "/experience#finance-and-banking");
    }

    #[test]
    fn untitled_entries_are_skipped() {
        let corpus = Corpus {
            projects: vec![Project::default()],
            experience: vec![Experience::default()],
            ..Corpus::default()
        };

        assert!(SearchIndex::build(&corpus).is_empty());
    }

    #[test]
    fn project_without_id_gets_positional_id() {
        let corpus = Corpus {
            projects: vec![Project {
                title: "Anonymous".to_string(),
                ..Project::default()
            }],
            ..Corpus::default()
        };

        assert_eq!(SearchIndex::build(&corpus).projects()[0].id, "project-1");
    }

    #[test]
    fn all_chains_sub_indexes_in_order() {
        let index = SearchIndex::build(&sample_corpus());

        let kinds: Vec<_> = index.all().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            [
                RecordType::Project,
                RecordType::Skill,
                RecordType::Skill,
                RecordType::Certification,
                RecordType::Experience,
                RecordType::Experience,
            ]
        );
        assert_eq!(index.len(), 6);
    }
}
